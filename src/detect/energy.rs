//! Short-term energy estimation.

use crate::defaults;

/// Root-mean-square energy of a mono block.
///
/// Accumulates the sum of squares in `f64` to avoid precision loss on
/// large blocks, then returns `f32`. A small epsilon under the root keeps
/// the result strictly positive for digital silence, which in turn keeps
/// the seeded noise floor away from zero.
///
/// Precondition: `samples` is non-empty (the [`Detector`] rejects empty
/// blocks before calling this).
///
/// [`Detector`]: crate::detect::Detector
pub fn rms(samples: &[f32]) -> f32 {
    debug_assert!(!samples.is_empty(), "rms requires at least one sample");

    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let mean_square = sum_squares / samples.len() as f64;
    (mean_square + defaults::ENERGY_EPSILON).sqrt() as f32
}
