//! Dense per-zone vector addressed through a sparse index.

use std::sync::Arc;

use crate::ids::IndexKey;
use crate::{OdError, OdResult, SparseIndex, ZoneNumber};

/// One value per key in `index`, stored in flat order.
#[derive(Clone, Debug)]
pub struct Vector<T, K: IndexKey = ZoneNumber> {
    index: Arc<SparseIndex<K>>,
    data:  Vec<T>,
}

impl<T, K: IndexKey> Vector<T, K> {
    pub fn zeros(index: Arc<SparseIndex<K>>) -> Self
    where
        T: Clone + Default,
    {
        let data = vec![T::default(); index.len()];
        Self { index, data }
    }

    /// Wrap a flat buffer.  Its length must equal the index length.
    pub fn from_flat(index: Arc<SparseIndex<K>>, data: Vec<T>) -> OdResult<Self> {
        if data.len() != index.len() {
            return Err(OdError::DimensionMismatch {
                what:     "vector data",
                expected: index.len(),
                got:      data.len(),
            });
        }
        Ok(Self { index, data })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn index(&self) -> &Arc<SparseIndex<K>> {
        &self.index
    }

    pub fn get(&self, key: K) -> OdResult<&T> {
        Ok(&self.data[self.index.index_of(key)?])
    }

    pub fn set(&mut self, key: K, value: T) -> OdResult<()> {
        let i = self.index.index_of(key)?;
        self.data[i] = value;
        Ok(())
    }

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

    /// Allocate a zeroed vector over the same index.
    pub fn create_similar<U: Clone + Default>(&self) -> Vector<U, K> {
        Vector::zeros(Arc::clone(&self.index))
    }
}

impl<K: IndexKey> Vector<f32, K> {
    pub fn total(&self) -> f32 {
        crate::numeric::sum(&self.data)
    }
}
