//! Doubly-constrained gravity distribution by iterative proportional fitting.
//!
//! # Iteration
//!
//! ```text
//! A*_d = 1                                       (column factors)
//! repeat:
//!   ① rows     T_od = P_o · F_od · A_d · A*_d / Σ_d' F_od' · A_d' · A*_d'
//!   ② columns  r_d  = A_d / Σ_o T_od
//!              deviation = max_d |1 − r_d|
//!              A*_d ← A*_d · r_d
//! until deviation ≤ max_error  or  iterations = max_iterations
//! ```
//!
//! Step ① runs one Rayon task per origin row, each writing only its own row.
//! Step ② folds column totals into per-worker `f64` buffers and adds them
//! together, so no two workers accumulate into shared memory.
//!
//! The loop always ends right after a row pass: every row of the result sums
//! to its production exactly (up to float rounding) and the columns are
//! within `max_error` of their attractions when the solve converged.
//!
//! # Degenerate zones
//!
//! - Production ≤ 0: the row stays all zero.
//! - Attraction = 0: the column's weight is zero, so its flows are zero and
//!   it is left out of the deviation.
//! - A column with positive attraction but no reachable flow (zero friction
//!   from every origin) has its factor reset to 1 and does not block
//!   convergence; nothing can be sent there.
//!
//! Any NaN or infinity produced along the way is replaced by zero.

use rayon::prelude::*;

use od_core::numeric::{finite_or_zero, safe_ratio};
use od_core::{same_index, Matrix, OdError, Vector};

use crate::{GravityConfig, GravityError, GravityResult, Progress};

/// Outcome of a solve, alongside the flows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BalanceReport {
    /// Row passes performed.
    pub iterations: u32,
    /// `true` if `max_deviation ≤ max_error`.
    pub converged: bool,
    /// Largest `|1 − A_d / Σ_o T_od|` after the final row pass.
    pub max_deviation: f32,
}

/// Distributed flows plus the solver report.
#[derive(Clone, Debug)]
pub struct Distribution {
    pub flows:  Matrix<f32>,
    pub report: BalanceReport,
}

/// The IPF solver.  Stateless between calls.
#[derive(Copy, Clone, Debug)]
pub struct GravityBalancer {
    max_error:      f32,
    max_iterations: u32,
}

impl GravityBalancer {
    pub fn new(max_error: f32, max_iterations: u32) -> GravityResult<Self> {
        GravityConfig { max_error, max_iterations, ..GravityConfig::default() }.validate()?;
        Ok(Self { max_error, max_iterations })
    }

    pub fn from_config(config: &GravityConfig) -> GravityResult<Self> {
        Self::new(config.max_error, config.max_iterations)
    }

    /// Distribute `production` over destinations in proportion to
    /// `friction × attraction`, matching both marginals.
    ///
    /// `friction` rows must be indexed like `production` and its columns like
    /// `attraction`.  The marginals should already have equal totals (see
    /// [`balance_marginals`](crate::balance_marginals)); if they do not, the
    /// columns cannot all be matched and the solve runs to
    /// `max_iterations`.
    ///
    /// Non-convergence is reported in [`BalanceReport`], not as an error.
    pub fn balance<P: Progress>(
        &self,
        friction:   &Matrix<f32>,
        production: &Vector<f32>,
        attraction: &Vector<f32>,
        progress:   &mut P,
    ) -> GravityResult<Distribution> {
        check_shapes(friction, production, attraction)?;

        let p = production.as_slice();
        let a = attraction.as_slice();
        let mut a_star = vec![1.0f32; a.len()];
        let mut flows = friction.create_similar::<f32>();

        let mut iterations = 0u32;
        let mut max_deviation;
        let mut converged = false;
        loop {
            progress.report(iterations as f32 / self.max_iterations as f32);

            distribute_rows(friction, p, a, &a_star, &mut flows);
            iterations += 1;

            max_deviation = balance_columns(&flows, a, &mut a_star);
            log::debug!("gravity iteration {iterations}: max attraction deviation {max_deviation:.6}");

            if max_deviation <= self.max_error {
                converged = true;
                break;
            }
            if iterations >= self.max_iterations {
                break;
            }
        }
        progress.report(1.0);

        if converged {
            log::info!("gravity model converged after {iterations} iteration(s)");
        } else {
            log::warn!(
                "gravity model stopped at the {} iteration cap with deviation {max_deviation:.6} (max error {})",
                self.max_iterations,
                self.max_error,
            );
        }

        Ok(Distribution {
            flows,
            report: BalanceReport { iterations, converged, max_deviation },
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_shapes(
    friction:   &Matrix<f32>,
    production: &Vector<f32>,
    attraction: &Vector<f32>,
) -> GravityResult<()> {
    if production.len() != friction.rows() {
        return Err(OdError::DimensionMismatch {
            what:     "production",
            expected: friction.rows(),
            got:      production.len(),
        }
        .into());
    }
    if attraction.len() != friction.cols() {
        return Err(OdError::DimensionMismatch {
            what:     "attraction",
            expected: friction.cols(),
            got:      attraction.len(),
        }
        .into());
    }
    if !same_index(friction.origins(), production.index()) {
        return Err(GravityError::Core(OdError::IndexMismatch { what: "production" }));
    }
    if !same_index(friction.destinations(), attraction.index()) {
        return Err(GravityError::Core(OdError::IndexMismatch { what: "attraction" }));
    }
    Ok(())
}

/// Row pass: scale every origin row so it sums to its production.
fn distribute_rows(friction: &Matrix<f32>, p: &[f32], a: &[f32], a_star: &[f32], flows: &mut Matrix<f32>) {
    let weights: Vec<f32> = a.iter().zip(a_star).map(|(&a, &s)| a * s).collect();

    flows.par_rows_mut().for_each(|(o, row)| {
        let production = p[o];
        if production <= 0.0 {
            row.fill(0.0);
            return;
        }
        let f = friction.row(o);
        let sum_fw: f64 = f.iter().zip(&weights).map(|(&f, &w)| (f * w) as f64).sum();
        let scale = safe_ratio(production, sum_fw as f32);
        for ((t, &f), &w) in row.iter_mut().zip(f).zip(&weights) {
            *t = finite_or_zero(f * scale * w);
        }
    });
}

/// Column pass: update the column factors and return the largest deviation.
fn balance_columns(flows: &Matrix<f32>, a: &[f32], a_star: &mut [f32]) -> f32 {
    let totals = flows.column_sums();
    let mut max_deviation = 0.0f32;
    for ((&target, &total), factor) in a.iter().zip(&totals).zip(a_star.iter_mut()) {
        if target == 0.0 {
            continue;
        }
        let residual = target / total;
        if residual.is_finite() {
            max_deviation = max_deviation.max((1.0 - residual).abs());
            *factor *= residual;
        } else {
            *factor = 1.0;
        }
    }
    max_deviation
}
