//! Configured gravity model: marginal balancing followed by distribution.

use od_core::{same_index, Matrix, OdError, Vector, ZoneSystem};

use crate::{
    balance_marginals, balance_marginals_grouped, Distribution, GravityBalancer, GravityConfig,
    GravityError, GravityResult, Marginals, Progress, SpatialAggregation,
};

/// A validated [`GravityConfig`] ready to run.
///
/// # Usage
///
/// ```rust,ignore
/// let model = GravityModel::new(GravityConfig::default())?;
/// let dist = model.distribute(&friction, &production, &attraction, None, &mut NoProgress)?;
/// assert!(dist.report.converged);
/// ```
#[derive(Clone, Debug)]
pub struct GravityModel {
    config:   GravityConfig,
    balancer: GravityBalancer,
}

impl GravityModel {
    pub fn new(config: GravityConfig) -> GravityResult<Self> {
        let balancer = GravityBalancer::from_config(&config)?;
        Ok(Self { config, balancer })
    }

    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    /// Balance the marginals per the configured policy, then distribute.
    ///
    /// `zones` is required when the spatial aggregation is not `Global`, and
    /// must be the zone system the marginals are indexed by.
    pub fn distribute<P: Progress>(
        &self,
        friction:   &Matrix<f32>,
        production: &Vector<f32>,
        attraction: &Vector<f32>,
        zones:      Option<&ZoneSystem>,
        progress:   &mut P,
    ) -> GravityResult<Distribution> {
        let marginals = self.balance(production, attraction, zones)?;
        self.balancer
            .balance(friction, &marginals.production, &marginals.attraction, progress)
    }

    /// Only the marginal-balancing step.
    pub fn balance(
        &self,
        production: &Vector<f32>,
        attraction: &Vector<f32>,
        zones:      Option<&ZoneSystem>,
    ) -> GravityResult<Marginals> {
        let policy = self.config.balance;
        if self.config.spatial == SpatialAggregation::Global {
            return balance_marginals(policy, production, attraction);
        }

        let zones = zones.ok_or_else(|| {
            GravityError::Config(format!(
                "{:?} balancing needs a zone system to group zones by",
                self.config.spatial
            ))
        })?;
        if !same_index(zones.index(), production.index()) {
            return Err(OdError::IndexMismatch { what: "production" }.into());
        }

        match self.config.spatial {
            SpatialAggregation::PlanningDistrict => {
                balance_marginals_grouped(policy, production, attraction, &zones.planning_district_index())
            }
            SpatialAggregation::Region => {
                balance_marginals_grouped(policy, production, attraction, &zones.region_index())
            }
            SpatialAggregation::Global => balance_marginals(policy, production, attraction),
        }
    }
}
