//! Circular crop mask and preview vignette.
//!
//! The same circle test decides which pixels are kept in the committed
//! avatar and which pixels the preview leaves undimmed.

pub mod circle;

pub use circle::{CircleMask, Vignette};

/// Smootherstep interpolation function.
///
/// Returns values from 0.0 to 1.0 with zero velocity and acceleration at boundaries,
/// used for the vignette ramp outside the crop circle.
///
/// Formula: `6t^5 - 15t^4 + 10t^3`
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}
