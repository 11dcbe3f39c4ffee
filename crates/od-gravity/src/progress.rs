//! Progress reporting for long-running solves.

/// Receives the completed fraction (`0.0 ..= 1.0`) of a solve.
///
/// Purely observational: nothing a sink does can change the result.  Any
/// `FnMut(f32)` closure is a sink.
///
/// # Example
///
/// ```rust
/// use od_gravity::Progress;
///
/// let mut seen = Vec::new();
/// let mut sink = |p: f32| seen.push(p);
/// sink.report(0.5);
/// assert_eq!(seen, vec![0.5]);
/// ```
pub trait Progress {
    fn report(&mut self, fraction: f32);
}

impl<F: FnMut(f32)> Progress for F {
    #[inline]
    fn report(&mut self, fraction: f32) {
        self(fraction)
    }
}

/// A [`Progress`] sink that discards every update.
pub struct NoProgress;

impl Progress for NoProgress {
    #[inline]
    fn report(&mut self, _fraction: f32) {}
}
