//! Deterministic per-stream RNG.
//!
//! # Determinism strategy
//!
//! Randomized work is split into independent units (one planning-district
//! block in the integerizer, for example).  Each unit gets its own `SmallRng`
//! seeded by:
//!
//!   seed = master_seed XOR (stream * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream numbers across the seed space.  This
//! means:
//!
//! - Units never share RNG state, so they can run on any Rayon worker in any
//!   order and still produce identical results.
//! - The same master seed and input always reproduce the same output.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// One deterministic random stream derived from a master seed.
///
/// The type is not `Sync`; each Rayon task creates its own.
pub struct StreamRng(SmallRng);

impl StreamRng {
    /// Seed deterministically from the run's master seed and a stream number.
    pub fn new(master_seed: u64, stream: u64) -> Self {
        let seed = master_seed ^ stream.wrapping_add(1).wrapping_mul(MIXING_CONSTANT);
        StreamRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}
