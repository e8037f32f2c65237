//! Source pixel sampling.
//!
//! Coordinates are continuous source-space positions where pixel `i` covers
//! `[i, i + 1)` and its centre is `i + 0.5`. Points outside `[0, width) x
//! [0, height)` have no source content and return `None`, which callers turn
//! into transparency or the viewport backdrop.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// Interpolation filter for sampling the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest pixel, no blending.
    Nearest,
    /// Bilinear interpolation of the 4 nearest pixel centres.
    #[default]
    Bilinear,
}

/// Sample `image` at `(x, y)` with the given filter.
#[inline]
pub fn sample(
    image: &DecodedImage,
    x: f64,
    y: f64,
    filter: InterpolationFilter,
) -> Option<[u8; 3]> {
    match filter {
        InterpolationFilter::Nearest => sample_nearest(image, x, y),
        InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
    }
}

#[inline]
fn in_bounds(image: &DecodedImage, x: f64, y: f64) -> bool {
    // Written so NaN fails the test
    !image.is_empty()
        && x >= 0.0
        && y >= 0.0
        && x < image.width as f64
        && y < image.height as f64
}

/// Sample the pixel containing `(x, y)`.
pub fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> Option<[u8; 3]> {
    if !in_bounds(image, x, y) {
        return None;
    }
    let px = (x.floor() as u32).min(image.width - 1);
    let py = (y.floor() as u32).min(image.height - 1);
    Some(image.pixel(px, py))
}

/// Sample using bilinear interpolation between pixel centres.
///
/// Within half a pixel of the border the edge pixels are clamped, so the
/// whole source area yields content.
pub fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> Option<[u8; 3]> {
    if !in_bounds(image, x, y) {
        return None;
    }

    let max_x = image.width - 1;
    let max_y = image.height - 1;

    // Shift to pixel-centre lattice
    let cx = (x - 0.5).max(0.0);
    let cy = (y - 0.5).max(0.0);

    let x0 = (cx.floor() as u32).min(max_x);
    let y0 = (cy.floor() as u32).min(max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);

    let fx = (cx - x0 as f64).clamp(0.0, 1.0);
    let fy = (cy - y0 as f64).clamp(0.0, 1.0);

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] as f64 * (1.0 - fx) * (1.0 - fy)
            + p10[i] as f64 * fx * (1.0 - fy)
            + p01[i] as f64 * (1.0 - fx) * fy
            + p11[i] as f64 * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }

    Some(result)
}
