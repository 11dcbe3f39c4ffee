//! Dense origin × destination storage addressed through sparse indexes.
//!
//! # Data layout
//!
//! One contiguous row-major `Vec<T>`:
//!
//! ```text
//! data[ o * cols + d ]   o = flat origin, d = flat destination
//! ```
//!
//! Row-major order is also the on-disk order of the binary matrix format, so
//! a matrix can be written with a single pass over [`Matrix::as_slice`].
//!
//! The origin and destination indexes may differ (rectangular or
//! cross-zone-system matrices) but must share the key type.  Every cell is
//! always defined; there is no "missing" value other than the default.
//!
//! # Parallel access
//!
//! Rows are the unit of parallel work.  [`Matrix::par_rows_mut`] hands out
//! disjoint `&mut [T]` rows to Rayon workers, so no two workers ever write
//! the same cell.

use std::sync::Arc;

use rayon::prelude::*;

use crate::ids::IndexKey;
use crate::index::same_index;
use crate::{OdError, OdResult, SparseIndex, ZoneNumber};

// ── OD record ─────────────────────────────────────────────────────────────────

/// One `(origin, destination, value)` triple from an external OD reader.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OdRecord {
    pub origin:      ZoneNumber,
    pub destination: ZoneNumber,
    pub value:       f32,
}

impl From<OdRecord> for (ZoneNumber, ZoneNumber, f32) {
    fn from(r: OdRecord) -> Self {
        (r.origin, r.destination, r.value)
    }
}

// ── Matrix ────────────────────────────────────────────────────────────────────

/// Dense `|origins| × |destinations|` array.
#[derive(Clone, Debug)]
pub struct Matrix<T, K: IndexKey = ZoneNumber> {
    origins:      Arc<SparseIndex<K>>,
    destinations: Arc<SparseIndex<K>>,
    data:         Vec<T>,
}

impl<T, K: IndexKey> Matrix<T, K> {
    /// Allocate with every cell set to `T::default()`.
    pub fn zeros(origins: Arc<SparseIndex<K>>, destinations: Arc<SparseIndex<K>>) -> Self
    where
        T: Clone + Default,
    {
        let data = vec![T::default(); origins.len() * destinations.len()];
        Self { origins, destinations, data }
    }

    /// Wrap an existing row-major buffer.  The length must be exactly
    /// `|origins| × |destinations|`.
    pub fn from_flat(
        origins:      Arc<SparseIndex<K>>,
        destinations: Arc<SparseIndex<K>>,
        data:         Vec<T>,
    ) -> OdResult<Self> {
        let expected = origins.len() * destinations.len();
        if data.len() != expected {
            return Err(OdError::DimensionMismatch {
                what: "matrix data",
                expected,
                got: data.len(),
            });
        }
        Ok(Self { origins, destinations, data })
    }

    /// Build every cell from a function of the origin and destination keys.
    ///
    /// Rows are filled in parallel; `f` must therefore be `Sync`.
    pub fn from_fn<F>(origins: Arc<SparseIndex<K>>, destinations: Arc<SparseIndex<K>>, f: F) -> Self
    where
        T: Clone + Default + Send,
        F: Fn(K, K) -> T + Sync,
    {
        let mut matrix = Self::zeros(origins, destinations);
        let dest_keys = Arc::clone(&matrix.destinations);
        let origin_keys = Arc::clone(&matrix.origins);
        matrix.par_rows_mut().for_each(|(o, row)| {
            let origin = origin_keys.key_at(o);
            for (d, cell) in row.iter_mut().enumerate() {
                *cell = f(origin, dest_keys.key_at(d));
            }
        });
        matrix
    }

    // ── Shape ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn rows(&self) -> usize {
        self.origins.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.destinations.len()
    }

    #[inline]
    pub fn origins(&self) -> &Arc<SparseIndex<K>> {
        &self.origins
    }

    #[inline]
    pub fn destinations(&self) -> &Arc<SparseIndex<K>> {
        &self.destinations
    }

    /// `true` if rows and columns are defined over the same zones.
    pub fn is_square(&self) -> bool {
        same_index(&self.origins, &self.destinations)
    }

    /// Allocate a zeroed matrix with the same indexes.
    pub fn create_similar<U: Clone + Default>(&self) -> Matrix<U, K> {
        Matrix::zeros(Arc::clone(&self.origins), Arc::clone(&self.destinations))
    }

    // ── Cell access ───────────────────────────────────────────────────────

    /// Value at `(origin, destination)`.  Unknown zones are a hard error.
    pub fn get(&self, origin: K, destination: K) -> OdResult<&T> {
        let o = self.origins.index_of(origin)?;
        let d = self.destinations.index_of(destination)?;
        Ok(&self.data[o * self.cols() + d])
    }

    /// Overwrite the value at `(origin, destination)`.
    pub fn set(&mut self, origin: K, destination: K, value: T) -> OdResult<()> {
        let o = self.origins.index_of(origin)?;
        let d = self.destinations.index_of(destination)?;
        let cols = self.cols();
        self.data[o * cols + d] = value;
        Ok(())
    }

    /// Value at flat position `(o, d)`.
    #[inline]
    pub fn at(&self, o: usize, d: usize) -> &T {
        &self.data[o * self.cols() + d]
    }

    #[inline]
    pub fn at_mut(&mut self, o: usize, d: usize) -> &mut T {
        let cols = self.cols();
        &mut self.data[o * cols + d]
    }

    #[inline]
    pub fn row(&self, o: usize) -> &[T] {
        let cols = self.cols();
        &self.data[o * cols..(o + 1) * cols]
    }

    #[inline]
    pub fn row_mut(&mut self, o: usize) -> &mut [T] {
        let cols = self.cols();
        &mut self.data[o * cols..(o + 1) * cols]
    }

    /// Whole row-major buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_flat(self) -> Vec<T> {
        self.data
    }

    // ── Parallel row iteration ────────────────────────────────────────────

    /// Parallel iterator over `(flat_origin, row)`.
    pub fn par_rows(&self) -> impl IndexedParallelIterator<Item = (usize, &[T])>
    where
        T: Sync,
    {
        // `max(1)`: a zero-column matrix has an empty buffer and no rows to visit.
        self.data.par_chunks(self.cols().max(1)).enumerate()
    }

    /// Parallel iterator over `(flat_origin, &mut row)`.
    pub fn par_rows_mut(&mut self) -> impl IndexedParallelIterator<Item = (usize, &mut [T])>
    where
        T: Send,
    {
        let cols = self.cols().max(1);
        self.data.par_chunks_mut(cols).enumerate()
    }
}

impl<K: IndexKey> Matrix<f32, K> {
    /// Load `(origin, destination, value)` records over the given indexes.
    ///
    /// Cells without a record stay `0.0`.  A record whose origin or
    /// destination is not in its index fails the whole load; a repeated pair
    /// overwrites the earlier value.
    pub fn from_records<I, R>(
        origins:      Arc<SparseIndex<K>>,
        destinations: Arc<SparseIndex<K>>,
        records:      I,
    ) -> OdResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<(K, K, f32)>,
    {
        let mut matrix = Self::zeros(origins, destinations);
        for record in records {
            let (origin, destination, value) = record.into();
            matrix.set(origin, destination, value)?;
        }
        Ok(matrix)
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f32> {
        (0..self.rows())
            .into_par_iter()
            .map(|o| crate::numeric::sum(self.row(o)))
            .collect()
    }

    /// Sum of each column.
    ///
    /// Each worker accumulates into its own `Vec<f64>`; the partial vectors
    /// are added together at the end so workers never share a cache line.
    pub fn column_sums(&self) -> Vec<f32> {
        let cols = self.cols();
        self.par_rows()
            .fold(
                || vec![0.0f64; cols],
                |mut acc, (_, row)| {
                    for (a, &v) in acc.iter_mut().zip(row) {
                        *a += v as f64;
                    }
                    acc
                },
            )
            .reduce(
                || vec![0.0f64; cols],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            )
            .into_iter()
            .map(|v| v as f32)
            .collect()
    }

    /// Sum of every cell.
    pub fn total(&self) -> f64 {
        self.data.par_iter().map(|&v| v as f64).sum()
    }
}
