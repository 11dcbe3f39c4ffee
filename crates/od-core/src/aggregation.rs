//! Zone → group aggregation (planning districts, regions).
//!
//! # Layout
//!
//! ```text
//! groups:      SparseIndex<G>      distinct group keys, ascending
//! zone_group:  Vec<usize>          flat zone  → flat group
//! members:     Vec<Vec<usize>>     flat group → flat zones (ascending)
//! ```
//!
//! Every zone maps to exactly one group.  `members` lists a group's zones in
//! ascending flat order, which is also the row-major visiting order used when
//! walking the cells of a group × group block.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::ids::IndexKey;
use crate::{OdError, OdResult, SparseIndex};

/// Secondary index grouping the zones of a zone system.
#[derive(Clone, Debug)]
pub struct AggregationIndex<G: IndexKey> {
    groups:     Arc<SparseIndex<G>>,
    zone_group: Vec<usize>,
    members:    Vec<Vec<usize>>,
}

impl<G: IndexKey> AggregationIndex<G> {
    /// Build from the group key of every zone, in flat zone order.
    pub fn from_keys<I: IntoIterator<Item = G>>(zone_keys: I) -> Self {
        let zone_keys: Vec<G> = zone_keys.into_iter().collect();

        let distinct: FxHashSet<G> = zone_keys.iter().copied().collect();
        let mut keys: Vec<G> = distinct.into_iter().collect();
        keys.sort_unstable();
        let groups = SparseIndex::from_sorted_unique(keys);

        let mut members = vec![Vec::new(); groups.len()];
        let zone_group: Vec<usize> = zone_keys
            .iter()
            .enumerate()
            .map(|(zone, &key)| {
                // Every key was inserted above, so the lookup cannot miss.
                let g = groups.try_index_of(key).unwrap_or_default();
                members[g].push(zone);
                g
            })
            .collect();

        Self {
            groups: Arc::new(groups),
            zone_group,
            members,
        }
    }

    #[inline]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn zone_count(&self) -> usize {
        self.zone_group.len()
    }

    #[inline]
    pub fn groups(&self) -> &Arc<SparseIndex<G>> {
        &self.groups
    }

    /// Flat group of the zone at flat position `zone`.
    #[inline]
    pub fn group_of(&self, zone: usize) -> usize {
        self.zone_group[zone]
    }

    /// Flat zones belonging to flat group `group`, ascending.
    #[inline]
    pub fn members(&self, group: usize) -> &[usize] {
        &self.members[group]
    }

    /// Sum a per-zone slice into per-group totals (accumulated in `f64`).
    ///
    /// Fails with `DimensionMismatch` unless `values` has one entry per zone.
    pub fn aggregate(&self, values: &[f32]) -> OdResult<Vec<f64>> {
        if values.len() != self.zone_count() {
            return Err(OdError::DimensionMismatch {
                what:     "aggregated values",
                expected: self.zone_count(),
                got:      values.len(),
            });
        }
        let mut totals = vec![0.0f64; self.group_count()];
        for (&g, &v) in self.zone_group.iter().zip(values) {
            totals[g] += v as f64;
        }
        Ok(totals)
    }
}
