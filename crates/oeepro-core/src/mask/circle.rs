//! Circular crop mask and the vignette drawn around it.
//!
//! The mask is a hard-edged circle in pixel coordinates: a pixel belongs to
//! the crop when its centre lies inside or on the circle. The vignette dims
//! everything outside, ramping up over `feather` pixels beyond the edge so
//! that pixels inside the circle are never touched.

use super::smootherstep;
use serde::{Deserialize, Serialize};

/// Circle in raster pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleMask {
    /// Center X in pixels
    pub center_x: f64,
    /// Center Y in pixels
    pub center_y: f64,
    /// Radius in pixels
    pub radius: f64,
}

impl CircleMask {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius: radius.max(0.0),
        }
    }

    /// Circle of diameter `diameter` centred in a `side x side` raster.
    pub fn centered(side: u32, diameter: f64) -> Self {
        let c = side as f64 / 2.0;
        Self::new(c, c, diameter / 2.0)
    }

    #[inline]
    fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy
    }

    /// Check if a point is inside the circle (boundary included).
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.distance_sq(x, y) <= self.radius * self.radius
    }

    /// Check if the centre of pixel `(px, py)` is inside the circle.
    #[inline]
    pub fn contains_pixel(&self, px: u32, py: u32) -> bool {
        self.contains(px as f64 + 0.5, py as f64 + 0.5)
    }

    /// Distance of a point beyond the circle edge (0 inside).
    #[inline]
    pub fn outside_distance(&self, x: f64, y: f64) -> f64 {
        (self.distance_sq(x, y).sqrt() - self.radius).max(0.0)
    }
}

/// Dimming applied outside the crop circle in the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vignette {
    /// Maximum dimming (0.0 = none, 1.0 = fully replaced by `color`)
    pub strength: f64,
    /// Width in pixels of the ramp outside the circle edge
    pub feather: f64,
    /// Overlay colour
    pub color: [u8; 3],
}

impl Default for Vignette {
    fn default() -> Self {
        Self {
            strength: 0.6,
            feather: 2.0,
            color: [0, 0, 0],
        }
    }
}

impl Vignette {
    /// Dimming weight for a point given its distance beyond the circle edge.
    pub fn weight(&self, outside_distance: f64) -> f64 {
        let strength = self.strength.clamp(0.0, 1.0);
        if outside_distance <= 0.0 {
            return 0.0;
        }
        if self.feather <= 0.0 {
            return strength;
        }
        strength * smootherstep((outside_distance / self.feather) as f32) as f64
    }
}
