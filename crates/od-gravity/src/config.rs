//! Gravity-model run configuration.
//!
//! Typically deserialized from the application's run file (with the `serde`
//! feature) and handed to [`GravityModel::new`](crate::GravityModel::new).
//! Defaults match the long-standing run-parameter defaults: 5 % attraction
//! error, 100 iterations, attraction matched to production, global scope.

use crate::{GravityError, GravityResult};

/// How production and attraction totals are reconciled before distribution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BalancePolicy {
    /// Pass both vectors through unchanged.  The caller is responsible for
    /// supplying equal totals.
    NoBalancing,
    /// Scale attraction so its total equals production's.
    #[default]
    MatchToProduction,
    /// Scale production so its total equals attraction's.
    MatchToAttraction,
    /// Scale both to the average of the two totals.
    AverageProductionAttraction,
}

/// Spatial unit over which the balance policy is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpatialAggregation {
    /// One total for the whole zone system.
    #[default]
    Global,
    /// Balance within each planning district.
    PlanningDistrict,
    /// Balance within each region.
    Region,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GravityConfig {
    /// Largest accepted relative deviation `|1 − A_d / Σ_o T_od|` over all
    /// destinations.  0.05 = within 5 %.
    pub max_error: f32,

    /// Hard cap on row/column passes.  Reaching it is not an error.
    pub max_iterations: u32,

    pub balance: BalancePolicy,

    pub spatial: SpatialAggregation,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            max_error:      0.05,
            max_iterations: 100,
            balance:        BalancePolicy::default(),
            spatial:        SpatialAggregation::default(),
        }
    }
}

impl GravityConfig {
    pub fn validate(&self) -> GravityResult<()> {
        if !self.max_error.is_finite() || self.max_error < 0.0 {
            return Err(GravityError::Config(format!(
                "max_error must be a finite, non-negative number (got {})",
                self.max_error
            )));
        }
        if self.max_iterations == 0 {
            return Err(GravityError::Config("max_iterations must be at least 1".into()));
        }
        Ok(())
    }
}
