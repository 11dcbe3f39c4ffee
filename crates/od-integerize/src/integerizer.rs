//! Stochastic rounding that conserves group × group totals.
//!
//! # Algorithm
//!
//! ```text
//! ① every cell      v = trunc(v) + r            (r = fractional remainder)
//!    every block    R_gh = Σ r over cells with origin in g, destination in h
//! ② every block     k = round(R_gh) extra units   (ties to even)
//!    repeat k times:
//!      draw  u · (remaining remainder mass of the block)
//!      walk the block's cells in row-major order subtracting remainders;
//!      the first cell with a positive remainder that takes the draw to ≤ 0
//!      gets +1 and its remainder is zeroed
//! ```
//!
//! Step ① runs one Rayon task per row.  Block totals are accumulated into a
//! per-worker buffer and each buffer is merged into the shared totals under a
//! single lock.  Those totals only select the blocks that have remainder to
//! place.  Step ② recomputes each selected block's mass in a fixed order, so
//! the result does not depend on how rows were split between workers.
//!
//! Blocks are independent: each runs in parallel with its own
//! [`StreamRng`] stream (`stream = flat block index`), and the chosen cells
//! are applied to the output after all blocks finish.  The same seed and
//! input always give identical output.
//!
//! # Conservation
//!
//! Every block of the output sums to its truncated cells plus
//! `round(Σ remainders of the block)`, an exact half going to the nearest
//! even integer.  Away from halves that is `round(Σ input cells)`.
//! The whole-matrix total is conserved only up to the per-block roundings.
//!
//! If float drift walks a draw past every cell, the unit goes to the last
//! cell of the block that still has a positive remainder.  A unit is dropped
//! only when no such cell is left, which cannot happen for non-negative
//! input; dropped units are counted in the report and logged.

use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use od_core::numeric::finite_or_zero;
use od_core::{same_index, AggregationIndex, IndexKey, Matrix, OdError, StreamRng, ZoneSystem};

use crate::{IntegerizeConfig, IntegerizeResult};

/// Summary of one integerization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegerizeReport {
    /// Group × group blocks in the grouping.
    pub blocks:         usize,
    /// Extra units placed on top of the truncated values.
    pub assigned_units: u64,
    /// Units that found no cell to go to.
    pub dropped_units:  u64,
}

/// An all-integer matrix plus the report.
#[derive(Clone, Debug)]
pub struct Integerized {
    pub matrix: Matrix<f32>,
    pub report: IntegerizeReport,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Integerizer {
    config: IntegerizeConfig,
}

/// Cells chosen inside one block.
struct BlockDraws {
    cells:   Vec<usize>,
    dropped: u64,
}

impl Integerizer {
    pub fn new(config: IntegerizeConfig) -> Self {
        Self { config }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(IntegerizeConfig { seed })
    }

    pub fn config(&self) -> &IntegerizeConfig {
        &self.config
    }

    /// Integerize a square matrix over `zones`, conserving planning
    /// district × planning district totals.
    pub fn integerize_by_planning_district(
        &self,
        matrix: &Matrix<f32>,
        zones:  &ZoneSystem,
    ) -> IntegerizeResult<Integerized> {
        if !same_index(matrix.origins(), zones.index()) || !same_index(matrix.destinations(), zones.index()) {
            return Err(OdError::IndexMismatch { what: "matrix" }.into());
        }
        let districts = zones.planning_district_index();
        self.integerize(matrix, &districts, &districts)
    }

    /// Integerize `matrix`, conserving totals over every
    /// `origin_groups × destination_groups` block.
    ///
    /// `origin_groups` must cover the matrix rows and `destination_groups`
    /// its columns, in flat order.  The input is not modified.
    pub fn integerize<GO: IndexKey, GD: IndexKey>(
        &self,
        matrix:             &Matrix<f32>,
        origin_groups:      &AggregationIndex<GO>,
        destination_groups: &AggregationIndex<GD>,
    ) -> IntegerizeResult<Integerized> {
        check_groups("origin groups", origin_groups.zone_count(), matrix.rows())?;
        check_groups("destination groups", destination_groups.zone_count(), matrix.cols())?;

        let dest_group_count = destination_groups.group_count();
        let block_count = origin_groups.group_count() * dest_group_count;

        // ── ① Truncate and total the remainders per block ─────────────────
        let mut integers = matrix.create_similar::<f32>();
        let mut remainders = matrix.create_similar::<f32>();
        let block_totals = Mutex::new(vec![0.0f64; block_count]);

        integers
            .par_rows_mut()
            .zip(remainders.par_rows_mut())
            .fold(
                || vec![0.0f64; block_count],
                |mut local, ((o, ints), (_, rems))| {
                    let row_block = origin_groups.group_of(o) * dest_group_count;
                    for (d, ((i, r), &v)) in ints.iter_mut().zip(rems.iter_mut()).zip(matrix.row(o)).enumerate() {
                        let v = finite_or_zero(v);
                        *i = v.trunc();
                        *r = v - *i;
                        local[row_block + destination_groups.group_of(d)] += *r as f64;
                    }
                    local
                },
            )
            .for_each(|local| {
                let mut totals = block_totals.lock().unwrap_or_else(PoisonError::into_inner);
                for (t, l) in totals.iter_mut().zip(local) {
                    *t += l;
                }
            });

        let block_totals = block_totals.into_inner().unwrap_or_else(PoisonError::into_inner);
        log::debug!(
            "integerize: {block_count} block(s), remainder mass {:.3}",
            block_totals.iter().sum::<f64>(),
        );

        // ── ② Place the extra units block by block ────────────────────────
        let cols = matrix.cols();
        let seed = self.config.seed;
        let rems = remainders.as_slice();
        let draws: Vec<BlockDraws> = block_totals
            .par_iter()
            .enumerate()
            .filter(|&(_, &total)| total > 0.0)
            .map(|(b, _)| {
                let origins = origin_groups.members(b / dest_group_count);
                let destinations = destination_groups.members(b % dest_group_count);
                let cells = origins
                    .iter()
                    .flat_map(move |&o| destinations.iter().map(move |&d| o * cols + d));
                draw_block(cells.map(|flat| (flat, rems[flat])).collect(), StreamRng::new(seed, b as u64))
            })
            .collect();

        let mut report = IntegerizeReport { blocks: block_count, ..IntegerizeReport::default() };
        let out = integers.as_mut_slice();
        for block in &draws {
            for &flat in &block.cells {
                out[flat] += 1.0;
            }
            report.assigned_units += block.cells.len() as u64;
            report.dropped_units += block.dropped;
        }

        if report.dropped_units > 0 {
            log::warn!(
                "integerize: {} unit(s) had no cell with remaining remainder and were dropped",
                report.dropped_units,
            );
        }
        log::info!(
            "integerized {}×{} matrix: {} extra unit(s) over {block_count} block(s), total {:.0}",
            matrix.rows(),
            matrix.cols(),
            report.assigned_units,
            integers.total(),
        );

        Ok(Integerized { matrix: integers, report })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_groups(what: &'static str, got: usize, expected: usize) -> IntegerizeResult<()> {
    if got != expected {
        return Err(OdError::DimensionMismatch { what, expected, got }.into());
    }
    Ok(())
}

/// Choose the cells receiving `round(Σ remainder)` extra units in one block,
/// half-way masses rounding to even.
///
/// `cells` holds `(flat cell, remainder)` in row-major order.
fn draw_block(mut cells: Vec<(usize, f32)>, mut rng: StreamRng) -> BlockDraws {
    let mut mass: f64 = cells.iter().map(|&(_, r)| r as f64).sum();
    let units = mass.round_ties_even().max(0.0) as u64;

    let mut chosen = Vec::with_capacity(units as usize);
    let mut dropped = 0;
    for _ in 0..units {
        let mut pop = rng.unit() * mass;
        let mut pick = None;
        let mut last_positive = None;
        for (i, &(_, r)) in cells.iter().enumerate() {
            pop -= r as f64;
            if r > 0.0 {
                last_positive = Some(i);
                if pop <= 0.0 {
                    pick = Some(i);
                    break;
                }
            }
        }

        match pick.or(last_positive) {
            Some(i) => {
                let (flat, r) = cells[i];
                mass -= r as f64;
                cells[i].1 = 0.0;
                chosen.push(flat);
            }
            None => dropped += 1,
        }
    }

    BlockDraws { cells: chosen, dropped }
}
