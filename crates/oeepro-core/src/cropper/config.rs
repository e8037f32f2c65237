//! Cropper configuration.
//!
//! Every field has a default, so hosts only pass the values they change.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DEFAULT_MAX_SOURCE_PIXELS;
use crate::mask::Vignette;
use crate::transform::{InterpolationFilter, ZoomRange};

/// Largest accepted viewport or output side, in pixels.
pub const MAX_RASTER_SIZE: u32 = 4096;

/// Errors from validating a [`CropperConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Viewport, mask and output sizes must be non-zero")]
    ZeroSize,

    #[error("{field} ({size}) exceeds the {max} pixel limit")]
    TooLarge {
        field: &'static str,
        size: u32,
        max: u32,
    },

    #[error("Mask diameter ({mask}) must not exceed the viewport ({viewport})")]
    MaskLargerThanViewport { mask: u32, viewport: u32 },

    #[error("Invalid zoom range: min {min}, max {max}, step {step}")]
    InvalidZoomRange { min: f64, max: f64, step: f64 },

    #[error("JPEG quality must be 1-100, got {0}")]
    InvalidQuality(u8),

    #[error("Working copy edge must be non-zero")]
    ZeroWorkingEdge,
}

/// Fixed geometry of the cropper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSpec {
    /// Side of the square display viewport (`V`).
    pub viewport_size: u32,
    /// Diameter of the crop circle centred in the viewport (`D`).
    pub mask_diameter: u32,
    /// Side of the square output raster (`S`).
    pub output_size: u32,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            viewport_size: 256,
            mask_diameter: 150,
            output_size: 150,
        }
    }
}

impl ViewportSpec {
    /// Viewport pixels per output pixel (`D / S`).
    pub fn output_to_viewport_scale(&self) -> f64 {
        self.mask_diameter as f64 / self.output_size as f64
    }
}

/// Complete cropper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    pub viewport: ViewportSpec,
    pub zoom: ZoomRange,
    pub filter: InterpolationFilter,
    pub vignette: Vignette,
    /// Colour (RGBA) wherever the view shows no source content. The output
    /// uses it inside the circle too, so a panned-out crop looks as previewed.
    pub backdrop: [u8; 4],
    /// Colour that transparent output pixels (outside the circle) take in
    /// the JPEG.
    pub background: [u8; 3],
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,
    /// Largest accepted source, in pixels.
    pub max_source_pixels: u64,
    /// If set, sources with a longer edge are downscaled before editing.
    pub working_max_edge: Option<u32>,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportSpec::default(),
            zoom: ZoomRange::default(),
            filter: InterpolationFilter::Bilinear,
            vignette: Vignette::default(),
            backdrop: [24, 24, 27, 255],
            background: [0, 0, 0],
            jpeg_quality: 80,
            max_source_pixels: DEFAULT_MAX_SOURCE_PIXELS,
            working_max_edge: None,
        }
    }
}

impl CropperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ViewportSpec {
            viewport_size,
            mask_diameter,
            output_size,
        } = self.viewport;

        if viewport_size == 0 || mask_diameter == 0 || output_size == 0 {
            return Err(ConfigError::ZeroSize);
        }
        for (field, size) in [("viewport_size", viewport_size), ("output_size", output_size)] {
            if size > MAX_RASTER_SIZE {
                return Err(ConfigError::TooLarge {
                    field,
                    size,
                    max: MAX_RASTER_SIZE,
                });
            }
        }
        if mask_diameter > viewport_size {
            return Err(ConfigError::MaskLargerThanViewport {
                mask: mask_diameter,
                viewport: viewport_size,
            });
        }
        if !self.zoom.is_valid() {
            return Err(ConfigError::InvalidZoomRange {
                min: self.zoom.min,
                max: self.zoom.max,
                step: self.zoom.step,
            });
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }
        if self.working_max_edge == Some(0) {
            return Err(ConfigError::ZeroWorkingEdge);
        }
        Ok(())
    }
}
