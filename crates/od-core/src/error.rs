//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `OdError` as one variant
//! via `#[from]`, so structural errors raised here surface unchanged.
//!
//! Numeric degeneracy (NaN / infinity from a zero denominator) is never an
//! error anywhere in the workspace; it is masked to zero at the point where
//! it arises.  See [`numeric`](crate::numeric).

use thiserror::Error;

use crate::{PlanningDistrict, RegionNumber, ZoneNumber};

/// The top-level error type for `od-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum OdError {
    #[error("zone {0} does not exist in the zone system")]
    InvalidZone(ZoneNumber),

    #[error("planning district {0} does not exist in the aggregation index")]
    InvalidDistrict(PlanningDistrict),

    #[error("region {0} does not exist in the aggregation index")]
    InvalidRegion(RegionNumber),

    #[error("zone number {0} appears more than once")]
    DuplicateZone(String),

    #[error("{what} has length {got}, expected {expected}")]
    DimensionMismatch {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("{what} is not defined over the expected zone index")]
    IndexMismatch { what: &'static str },
}

/// Shorthand result type for `od-core`.
pub type OdResult<T> = Result<T, OdError>;
