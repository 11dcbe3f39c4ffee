//! Zones and zone systems.
//!
//! A `ZoneSystem` is supplied by an external loader (see `od-io`).  The core
//! only needs each zone's number and the two grouping keys used for
//! aggregation: its planning district and its region.

use std::sync::Arc;

use crate::{AggregationIndex, OdResult, PlanningDistrict, RegionNumber, SparseZoneIndex, ZoneNumber};

/// An atomic spatial unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub number:            ZoneNumber,
    pub planning_district: PlanningDistrict,
    pub region:            RegionNumber,
}

impl Zone {
    pub fn new(number: u32, planning_district: u32, region: u32) -> Self {
        Self {
            number:            ZoneNumber(number),
            planning_district: PlanningDistrict(planning_district),
            region:            RegionNumber(region),
        }
    }
}

/// All zones of one zone system, in flat (ascending zone number) order.
#[derive(Clone, Debug)]
pub struct ZoneSystem {
    zones: Vec<Zone>,
    index: Arc<SparseZoneIndex>,
}

impl ZoneSystem {
    /// Build from zones in any order.  Duplicate zone numbers are rejected.
    pub fn new(mut zones: Vec<Zone>) -> OdResult<Self> {
        let index = Arc::new(SparseZoneIndex::new(zones.iter().map(|z| z.number))?);
        zones.sort_unstable_by_key(|z| z.number);
        Ok(Self { zones, index })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zones in flat order: `zones()[i]` is the zone at flat position `i`.
    #[inline]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// The shared zone index.  Clone the `Arc` to build arrays over it.
    #[inline]
    pub fn index(&self) -> &Arc<SparseZoneIndex> {
        &self.index
    }

    pub fn zone(&self, number: ZoneNumber) -> OdResult<&Zone> {
        Ok(&self.zones[self.index.index_of(number)?])
    }

    /// Group zones by planning district.
    pub fn planning_district_index(&self) -> AggregationIndex<PlanningDistrict> {
        AggregationIndex::from_keys(self.zones.iter().map(|z| z.planning_district))
    }

    /// Group zones by region.
    pub fn region_index(&self) -> AggregationIndex<RegionNumber> {
        AggregationIndex::from_keys(self.zones.iter().map(|z| z.region))
    }
}
