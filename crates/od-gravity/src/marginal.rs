//! Production/attraction pre-balancing.
//!
//! A doubly-constrained distribution only has a solution when total
//! production equals total attraction.  The policies here reconcile the two
//! vectors before the solver runs:
//!
//! | Policy                        | Production          | Attraction          |
//! |-------------------------------|---------------------|---------------------|
//! | `NoBalancing`                 | unchanged           | unchanged           |
//! | `MatchToProduction`           | unchanged           | × ΣP / ΣA           |
//! | `MatchToAttraction`           | × ΣA / ΣP           | unchanged           |
//! | `AverageProductionAttraction` | × ((ΣP+ΣA)/2) / ΣP  | × ((ΣP+ΣA)/2) / ΣA  |
//!
//! With a grouped scope the sums are taken per planning district (or region)
//! and each zone is scaled by its own group's factor.  A factor whose
//! denominator is zero or negative, or which comes out NaN / infinite, is
//! replaced by `0.0`.
//!
//! Inputs are never modified; balanced copies are returned.

use od_core::numeric::finite_or_zero;
use od_core::{same_index, AggregationIndex, IndexKey, OdError, Vector};

use crate::{BalancePolicy, GravityResult};

/// Production and attraction vectors after balancing.
#[derive(Clone, Debug)]
pub struct Marginals {
    pub production: Vector<f32>,
    pub attraction: Vector<f32>,
}

/// Apply `policy` over the whole zone system.
pub fn balance_marginals(
    policy:     BalancePolicy,
    production: &Vector<f32>,
    attraction: &Vector<f32>,
) -> GravityResult<Marginals> {
    check_vectors(production, attraction)?;
    let p_total = [od_core::numeric::sum(production.as_slice()) as f64];
    let a_total = [od_core::numeric::sum(attraction.as_slice()) as f64];
    Ok(rescale(policy, production, attraction, &p_total, &a_total, |_| 0))
}

/// Apply `policy` independently inside each group of `groups`.
pub fn balance_marginals_grouped<G: IndexKey>(
    policy:     BalancePolicy,
    production: &Vector<f32>,
    attraction: &Vector<f32>,
    groups:     &AggregationIndex<G>,
) -> GravityResult<Marginals> {
    check_vectors(production, attraction)?;
    let p_totals = groups.aggregate(production.as_slice())?;
    let a_totals = groups.aggregate(attraction.as_slice())?;
    Ok(rescale(policy, production, attraction, &p_totals, &a_totals, |z| {
        groups.group_of(z)
    }))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_vectors(production: &Vector<f32>, attraction: &Vector<f32>) -> GravityResult<()> {
    if production.len() != attraction.len() {
        return Err(OdError::DimensionMismatch {
            what:     "attraction",
            expected: production.len(),
            got:      attraction.len(),
        }
        .into());
    }
    if !same_index(production.index(), attraction.index()) {
        return Err(OdError::IndexMismatch { what: "attraction" }.into());
    }
    Ok(())
}

/// `target / total`, or `0.0` for a non-positive total or non-finite result.
#[inline]
fn factor(target: f64, total: f64) -> f32 {
    if total <= 0.0 {
        return 0.0;
    }
    finite_or_zero((target / total) as f32)
}

/// Per-group `(production_factor, attraction_factor)` for `policy`.
fn group_factors(policy: BalancePolicy, p: f64, a: f64) -> (f32, f32) {
    match policy {
        BalancePolicy::NoBalancing                 => (1.0, 1.0),
        BalancePolicy::MatchToProduction           => (1.0, factor(p, a)),
        BalancePolicy::MatchToAttraction           => (factor(a, p), 1.0),
        BalancePolicy::AverageProductionAttraction => {
            let average = (p + a) * 0.5;
            (factor(average, p), factor(average, a))
        }
    }
}

fn rescale<F>(
    policy:     BalancePolicy,
    production: &Vector<f32>,
    attraction: &Vector<f32>,
    p_totals:   &[f64],
    a_totals:   &[f64],
    group_of:   F,
) -> Marginals
where
    F: Fn(usize) -> usize,
{
    if policy == BalancePolicy::NoBalancing {
        return Marginals {
            production: production.clone(),
            attraction: attraction.clone(),
        };
    }

    let factors: Vec<(f32, f32)> = p_totals
        .iter()
        .zip(a_totals)
        .map(|(&p, &a)| group_factors(policy, p, a))
        .collect();

    let mut new_production = production.clone();
    let mut new_attraction = attraction.clone();
    for (z, (p, a)) in new_production
        .as_mut_slice()
        .iter_mut()
        .zip(new_attraction.as_mut_slice())
        .enumerate()
    {
        let (fp, fa) = factors[group_of(z)];
        *p *= fp;
        *a *= fa;
    }

    log::debug!(
        "balanced marginals with {policy:?} over {} group(s): production {:.3}, attraction {:.3}",
        factors.len(),
        new_production.total(),
        new_attraction.total(),
    );

    Marginals {
        production: new_production,
        attraction: new_attraction,
    }
}
