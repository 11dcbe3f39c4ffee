//! `od-gravity` — production/attraction balancing and doubly-constrained
//! gravity distribution.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`config`]   | `GravityConfig`, `BalancePolicy`, `SpatialAggregation`       |
//! | [`marginal`] | `balance_marginals`, `balance_marginals_grouped`, `Marginals`|
//! | [`balancer`] | `GravityBalancer`, `Distribution`, `BalanceReport`           |
//! | [`model`]    | `GravityModel` (balance → distribute)                        |
//! | [`progress`] | `Progress` trait, `NoProgress`                               |
//! | [`error`]    | `GravityError`, `GravityResult<T>`                           |
//!
//! # Pipeline (summary)
//!
//! ```text
//! production, attraction ──► balance_marginals ──► GravityBalancer::balance ──► flows
//!                                                        ▲
//!                                   friction ────────────┘
//! ```

pub mod balancer;
pub mod config;
pub mod error;
pub mod marginal;
pub mod model;
pub mod progress;

#[cfg(test)]
mod tests;

pub use balancer::{BalanceReport, Distribution, GravityBalancer};
pub use config::{BalancePolicy, GravityConfig, SpatialAggregation};
pub use error::{GravityError, GravityResult};
pub use marginal::{balance_marginals, balance_marginals_grouped, Marginals};
pub use model::GravityModel;
pub use progress::{NoProgress, Progress};
