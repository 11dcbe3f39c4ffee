//! `od-core` — foundational types for the `rust_od` travel-demand toolkit.
//!
//! This crate is a dependency of every other `od-*` crate.  It has no `od-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`ids`]         | `ZoneNumber`, `PlanningDistrict`, `RegionNumber`       |
//! | [`index`]       | `SparseIndex<K>`, `SparseZoneIndex`                    |
//! | [`matrix`]      | `Matrix<T, K>`, `OdRecord`                             |
//! | [`vector`]      | `Vector<T, K>`                                         |
//! | [`zone`]        | `Zone`, `ZoneSystem`                                   |
//! | [`aggregation`] | `AggregationIndex<G>` (zone → PD / region)             |
//! | [`numeric`]     | NaN / infinity guards, `f64`-accumulated sums          |
//! | [`rng`]         | `StreamRng` (deterministic per-unit streams)           |
//! | [`error`]       | `OdError`, `OdResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `Zone`.          |

pub mod aggregation;
pub mod error;
pub mod ids;
pub mod index;
pub mod matrix;
pub mod numeric;
pub mod rng;
pub mod vector;
pub mod zone;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use aggregation::AggregationIndex;
pub use error::{OdError, OdResult};
pub use ids::{IndexKey, PlanningDistrict, RegionNumber, ZoneNumber};
pub use index::{same_index, SparseIndex, SparseZoneIndex};
pub use matrix::{Matrix, OdRecord};
pub use rng::StreamRng;
pub use vector::Vector;
pub use zone::{Zone, ZoneSystem};
