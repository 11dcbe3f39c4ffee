//! Numeric guards shared by every solver.
//!
//! Zero marginals are routine in real zone systems (water zones, external
//! stations, zones with no jobs).  Every ratio in the workspace goes through
//! these helpers so a zero denominator yields `0.0` instead of NaN.

/// `x` if finite, otherwise `0.0`.
#[inline]
pub fn finite_or_zero(x: f32) -> f32 {
    if x.is_finite() { x } else { 0.0 }
}

/// `num / den`, or `0.0` when the quotient is NaN or infinite.
#[inline]
pub fn safe_ratio(num: f32, den: f32) -> f32 {
    finite_or_zero(num / den)
}

/// Sum of a slice, accumulated in `f64`.
#[inline]
pub fn sum(values: &[f32]) -> f32 {
    values.iter().map(|&v| v as f64).sum::<f64>() as f32
}
