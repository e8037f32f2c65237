//! Contain-fit geometry and working-copy downscaling.
//!
//! The cropper displays the source at its natural aspect ratio scaled so it
//! fits inside the square viewport ("contain" scaling). Very large sources can
//! optionally be reduced to a working copy first; preview and output both
//! sample that copy, so they stay in agreement.

use super::{DecodeError, DecodedImage};

/// Result of fitting an image inside a square box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainFit {
    /// Source pixels to display pixels.
    pub scale: f64,
    /// Displayed width before any user zoom.
    pub rendered_width: f64,
    /// Displayed height before any user zoom.
    pub rendered_height: f64,
}

/// Fit `width x height` inside a `side x side` box, preserving aspect ratio.
///
/// Images smaller than the box are scaled up, so the longest edge always
/// equals `side`. A zero dimension yields a zero-sized fit.
pub fn contain_fit(width: u32, height: u32, side: f64) -> ContainFit {
    if width == 0 || height == 0 {
        return ContainFit {
            scale: 0.0,
            rendered_width: 0.0,
            rendered_height: 0.0,
        };
    }

    let scale = (side / width as f64).min(side / height as f64);
    ContainFit {
        scale,
        rendered_width: width as f64 * scale,
        rendered_height: height as f64 * scale,
    }
}

/// Downscale an image so its longest edge is at most `max_edge`.
///
/// Images already within the limit are returned unchanged.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if `max_edge` is zero, or the
/// [`DecodedImage::validate`] error if the buffer does not match the
/// dimensions.
pub fn downscale_to_fit(image: &DecodedImage, max_edge: u32) -> Result<DecodedImage, DecodeError> {
    if max_edge == 0 {
        return Err(DecodeError::InvalidFormat);
    }
    image.validate()?;

    if image.width <= max_edge && image.height <= max_edge {
        return Ok(image.clone());
    }

    let (new_width, new_height) = calculate_fit_dimensions(image.width, image.height, max_edge);

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(
        &rgb_image,
        new_width,
        new_height,
        image::imageops::FilterType::Triangle,
    );

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}
