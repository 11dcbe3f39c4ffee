//! Sparse-key → dense-position index.
//!
//! # Layout
//!
//! A `SparseIndex` is a strictly increasing `Vec` of keys.  The flat position
//! of a key is its position in that `Vec`, found by binary search:
//!
//! ```text
//! keys:   [ 101, 102, 205, 4021, 9000 ]
//! flat:       0    1    2     3     4
//! ```
//!
//! Indexes are built once per zone system and never mutated afterwards.
//! Matrices and vectors hold them behind an `Arc`, so many arrays can share
//! one index and cheaply check that they are defined over the same zones.
//!
//! Two different indexes are never implicitly compatible; moving data between
//! them goes through a `ZoneRemapper` (in `od-remap`).

use std::sync::Arc;

use crate::ids::IndexKey;
use crate::{Matrix, OdError, OdResult, Vector, ZoneNumber};

/// Sorted, duplicate-free key list with binary-search lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseIndex<K: IndexKey> {
    keys: Vec<K>,
}

/// The index used for zone systems.
pub type SparseZoneIndex = SparseIndex<ZoneNumber>;

impl<K: IndexKey> SparseIndex<K> {
    /// Build from keys in any order.  Fails with `DuplicateZone` if a key
    /// appears twice.
    pub fn new<I: IntoIterator<Item = K>>(keys: I) -> OdResult<Self> {
        let mut keys: Vec<K> = keys.into_iter().collect();
        keys.sort_unstable();
        if let Some(pair) = keys.windows(2).find(|w| w[0] == w[1]) {
            return Err(OdError::DuplicateZone(pair[0].to_string()));
        }
        Ok(Self { keys })
    }

    /// Build from a list already known to be strictly increasing.
    ///
    /// Used internally when the keys come out of a sort + dedup.
    pub(crate) fn from_sorted_unique(keys: Vec<K>) -> Self {
        debug_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        Self { keys }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All keys in flat order.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Flat position of `key`, or `None` if it is not in the index.
    #[inline]
    pub fn try_index_of(&self, key: K) -> Option<usize> {
        self.keys.binary_search(&key).ok()
    }

    /// Flat position of `key`.  An absent key is a hard error.
    #[inline]
    pub fn index_of(&self, key: K) -> OdResult<usize> {
        self.try_index_of(key).ok_or_else(|| key.missing())
    }

    /// Key stored at flat position `flat`.
    ///
    /// # Panics
    /// Panics if `flat >= self.len()`.
    #[inline]
    pub fn key_at(&self, flat: usize) -> K {
        self.keys[flat]
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.try_index_of(key).is_some()
    }

    /// Allocate a zeroed `len × len` matrix over this index.
    pub fn create_matrix<T: Clone + Default>(self: &Arc<Self>) -> Matrix<T, K> {
        Matrix::zeros(Arc::clone(self), Arc::clone(self))
    }

    /// Allocate a zeroed vector over this index.
    pub fn create_vector<T: Clone + Default>(self: &Arc<Self>) -> Vector<T, K> {
        Vector::zeros(Arc::clone(self))
    }
}

/// `true` if both handles refer to the same zones.
///
/// Pointer equality short-circuits the common case of a shared index.
#[inline]
pub fn same_index<K: IndexKey>(a: &Arc<SparseIndex<K>>, b: &Arc<SparseIndex<K>>) -> bool {
    Arc::ptr_eq(a, b) || a.keys == b.keys
}
