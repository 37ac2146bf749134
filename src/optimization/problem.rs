use super::solvers::traits::Objective;

/// Position at which [`CubicWell`] reaches its zero, located numerically.
/// Only used for monitoring, the swarm never reads it.
pub const KNOWN_ZERO: f64 = 326.038;

/// `f(x) = |(0.07x - 10)^3 - 8x + 500|`
///
/// Non-convex on `[0, 500]`: a local minimum near `x ≈ 54.7` (f ≈ 172.5)
/// and the global minimum `f = 0` at [`KNOWN_ZERO`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CubicWell;

impl Objective for CubicWell {
    #[inline]
    fn evaluate(&self, x: f64) -> f64 {
        ((0.07 * x - 10.0).powi(3) - 8.0 * x + 500.0).abs()
    }
}

/// Count positions lying strictly within `offset` of [`KNOWN_ZERO`]
pub fn near_minima(positions: &[f64], offset: f64) -> usize {
    positions
        .iter()
        .filter(|&&x| (x - KNOWN_ZERO).abs() < offset)
        .count()
}
