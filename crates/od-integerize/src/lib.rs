//! `od-integerize` — turn a fractional OD matrix into whole trips while
//! conserving planning-district (or any group × group) totals.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`integerizer`] | `Integerizer`, `Integerized`, `IntegerizeReport`      |
//! | [`config`]      | `IntegerizeConfig` (master seed)                      |
//! | [`error`]       | `IntegerizeError`, `IntegerizeResult<T>`              |

pub mod config;
pub mod error;
pub mod integerizer;


pub use config::IntegerizeConfig;
pub use error::{IntegerizeError, IntegerizeResult};
pub use integerizer::{Integerized, IntegerizeReport, Integerizer};
