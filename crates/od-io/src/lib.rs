//! `od-io` — file formats for exchanging matrices and zone systems.
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`od_csv`] | `read_od_csv`, `read_od_reader`, `write_od_csv`             |
//! | [`zones`]  | `load_zone_system_csv`, `load_zone_system_reader`           |
//! | [`binary`] | `read_matrix_binary`, `write_matrix_binary` (raw `f32` LE)  |
//! | [`error`]  | `MatrixIoError`, `MatrixIoResult<T>`                        |

pub mod binary;
pub mod error;
pub mod od_csv;
pub mod zones;


pub use binary::{read_matrix_binary, read_matrix_from, write_matrix_binary, write_matrix_to};
pub use error::{MatrixIoError, MatrixIoResult};
pub use od_csv::{read_od_csv, read_od_reader, write_od_csv, write_od_writer};
pub use zones::{load_zone_system_csv, load_zone_system_reader};
