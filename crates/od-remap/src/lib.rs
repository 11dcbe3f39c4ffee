//! `od-remap` — conversion of OD matrices and zone vectors between zone
//! systems.
//!
//! # Crate layout
//!
//! | Module             | Contents                                             |
//! |--------------------|------------------------------------------------------|
//! | [`mapping`]        | `MappingRow`, `load_mapping_csv`, `load_mapping_reader` |
//! | [`correspondence`] | `CorrespondenceMap` (normalized weights)             |
//! | [`convert`]        | `ZoneRemapper`, `Aggregation`                        |
//! | [`error`]          | `RemapError`, `RemapResult<T>`, `MappingSide`        |
//!
//! # Usage
//!
//! ```rust,ignore
//! let remapper = ZoneRemapper::from_mapping_csv(path, fine.index(), coarse.index())?;
//! let coarse_trips = remapper.convert_matrix(&fine_trips, Aggregation::Sum)?;
//! let coarse_times = remapper.convert_matrix(&fine_times, Aggregation::Average)?;
//! ```

pub mod convert;
pub mod correspondence;
pub mod error;
pub mod mapping;


pub use convert::{Aggregation, ZoneRemapper};
pub use correspondence::CorrespondenceMap;
pub use error::{MappingSide, RemapError, RemapResult};
pub use mapping::{load_mapping_csv, load_mapping_reader, MappingRow};
