//! Correspondence between two zone systems.
//!
//! The map is a dense `[converted × original]` weight array.  A column holds
//! the shares of one original zone across the converted zones, and after
//! construction every column sums to `1.0` (or is all zero when the original
//! zone is unmapped, or its weights sum to 0, NaN or infinity).  That keeps
//! `Sum` conversion mass-conserving for every mapped original zone.

use std::sync::Arc;

use rayon::prelude::*;

use od_core::numeric::finite_or_zero;
use od_core::{Matrix, SparseZoneIndex};

use crate::{MappingRow, MappingSide, RemapError, RemapResult};

#[derive(Clone, Debug)]
pub struct CorrespondenceMap {
    weights: Matrix<f32>,
}

impl CorrespondenceMap {
    /// Build and normalize the map from parsed mapping rows.
    ///
    /// Fails with [`RemapError::UnknownZoneInMapping`] on the first row whose
    /// original or converted zone is not in its index.  A repeated
    /// `(original, converted)` pair overwrites the earlier fraction.
    pub fn build(
        original:  &Arc<SparseZoneIndex>,
        converted: &Arc<SparseZoneIndex>,
        rows:      &[MappingRow],
    ) -> RemapResult<Self> {
        let mut weights = Matrix::zeros(converted.clone(), original.clone());
        for row in rows {
            let o = original.try_index_of(row.original).ok_or(RemapError::UnknownZoneInMapping {
                side: MappingSide::Original,
                zone: row.original,
                line: row.line,
            })?;
            let c = converted.try_index_of(row.converted).ok_or(RemapError::UnknownZoneInMapping {
                side: MappingSide::Converted,
                zone: row.converted,
                line: row.line,
            })?;
            *weights.at_mut(c, o) = row.fraction;
        }

        let unmapped = normalize_columns(&mut weights);
        log::debug!(
            "built correspondence map {} -> {} zones from {} row(s); {unmapped} original zone(s) unmapped",
            original.len(),
            converted.len(),
            rows.len(),
        );
        Ok(Self { weights })
    }

    pub fn original(&self) -> &Arc<SparseZoneIndex> {
        self.weights.destinations()
    }

    pub fn converted(&self) -> &Arc<SparseZoneIndex> {
        self.weights.origins()
    }

    /// Share of original zone `o` assigned to converted zone `c` (flat indices).
    #[inline]
    pub fn weight(&self, c: usize, o: usize) -> f32 {
        *self.weights.at(c, o)
    }

    /// The normalized `[converted × original]` weights.
    pub fn weights(&self) -> &Matrix<f32> {
        &self.weights
    }
}

/// Scale each column to sum to one; degenerate columns become zero.
/// Returns the number of all-zero columns.
fn normalize_columns(weights: &mut Matrix<f32>) -> usize {
    let sums = weights.column_sums();
    let divisors: Vec<Option<f32>> = sums
        .iter()
        .map(|&s| (s != 0.0 && s.is_finite()).then_some(s))
        .collect();

    weights.par_rows_mut().for_each(|(_, row)| {
        for (w, divisor) in row.iter_mut().zip(&divisors) {
            *w = match divisor {
                Some(s) => finite_or_zero(*w / s),
                None    => 0.0,
            };
        }
    });

    divisors.iter().filter(|d| d.is_none()).count()
}
