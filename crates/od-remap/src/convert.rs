//! Matrix and vector conversion between zone systems.
//!
//! With `M` the normalized `[converted × original]` correspondence weights:
//!
//! ```text
//! vector   y_i    = Σ_a M_ia · x_a
//! matrix   R_ij   = Σ_a Σ_b M_ia · M_jb · X_ab
//! ```
//!
//! The matrix form is evaluated in two passes, `T = M · X` then
//! `R = T · Mᵀ`, each parallel over output rows.  Zero weights are skipped in
//! the first pass, which is where sparse correspondences save most of the
//! work.
//!
//! `Average` divides each result by the total weight applied to it
//! (`Σ_a M_ia` for vectors, `Σ_a M_ia · Σ_b M_jb` for matrices).  A converted
//! zone that received no weight yields `0.0`.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use od_core::numeric::{finite_or_zero, safe_ratio};
use od_core::{same_index, Matrix, OdError, SparseZoneIndex, Vector};

use crate::{load_mapping_csv, CorrespondenceMap, MappingRow, RemapResult};

/// How converted values combine the original values mapped onto them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregation {
    /// Weighted sum.  Conserves totals for extensive data (trips, jobs).
    #[default]
    Sum,
    /// Weighted mean.  For intensive data (travel times, costs).
    Average,
}

/// Converts matrices and vectors from one zone system into another.
#[derive(Clone, Debug)]
pub struct ZoneRemapper {
    map: CorrespondenceMap,
}

impl ZoneRemapper {
    pub fn new(map: CorrespondenceMap) -> Self {
        Self { map }
    }

    pub fn from_rows(
        original:  &Arc<SparseZoneIndex>,
        converted: &Arc<SparseZoneIndex>,
        rows:      &[MappingRow],
    ) -> RemapResult<Self> {
        CorrespondenceMap::build(original, converted, rows).map(Self::new)
    }

    /// Load a mapping file and build the remapper in one step.
    pub fn from_mapping_csv(
        path:      &Path,
        original:  &Arc<SparseZoneIndex>,
        converted: &Arc<SparseZoneIndex>,
    ) -> RemapResult<Self> {
        let rows = load_mapping_csv(path)?;
        Self::from_rows(original, converted, &rows)
    }

    pub fn map(&self) -> &CorrespondenceMap {
        &self.map
    }

    /// Convert a square matrix over the original zone system.
    ///
    /// The source is only read; a new matrix over the converted zone system
    /// is returned.
    pub fn convert_matrix(&self, source: &Matrix<f32>, aggregation: Aggregation) -> RemapResult<Matrix<f32>> {
        let original = self.map.original();
        if !same_index(source.origins(), original) || !same_index(source.destinations(), original) {
            return Err(OdError::IndexMismatch { what: "source matrix" }.into());
        }
        let weights = self.map.weights();
        let converted = self.map.converted();

        // ① T = M · X
        let mut partial: Matrix<f32> = Matrix::zeros(converted.clone(), original.clone());
        partial.par_rows_mut().for_each(|(i, out)| {
            for (a, &w) in weights.row(i).iter().enumerate() {
                if w == 0.0 {
                    continue;
                }
                for (t, &x) in out.iter_mut().zip(source.row(a)) {
                    *t += w * x;
                }
            }
        });

        // ② R = T · Mᵀ
        let applied = match aggregation {
            Aggregation::Sum     => None,
            Aggregation::Average => Some(weights.row_sums()),
        };
        let mut result: Matrix<f32> = Matrix::zeros(converted.clone(), converted.clone());
        result.par_rows_mut().for_each(|(i, out)| {
            let t = partial.row(i);
            for (j, cell) in out.iter_mut().enumerate() {
                let value: f32 = t.iter().zip(weights.row(j)).map(|(&t, &m)| t * m).sum();
                *cell = match &applied {
                    Some(s) => safe_ratio(value, s[i] * s[j]),
                    None    => finite_or_zero(value),
                };
            }
        });

        log::debug!(
            "converted {}×{} matrix to {}×{} ({aggregation:?}): total {:.3} -> {:.3}",
            source.rows(),
            source.cols(),
            result.rows(),
            result.cols(),
            source.total(),
            result.total(),
        );
        Ok(result)
    }

    /// Convert a vector over the original zone system.
    pub fn convert_vector(&self, source: &Vector<f32>, aggregation: Aggregation) -> RemapResult<Vector<f32>> {
        if !same_index(source.index(), self.map.original()) {
            return Err(OdError::IndexMismatch { what: "source vector" }.into());
        }
        let weights = self.map.weights();
        let x = source.as_slice();

        let data: Vec<f32> = weights
            .par_rows()
            .map(|(_, m)| {
                let value: f32 = m.iter().zip(x).map(|(&m, &x)| m * x).sum();
                match aggregation {
                    Aggregation::Sum     => finite_or_zero(value),
                    Aggregation::Average => safe_ratio(value, m.iter().sum()),
                }
            })
            .collect();

        Ok(Vector::from_flat(self.map.converted().clone(), data)?)
    }
}
