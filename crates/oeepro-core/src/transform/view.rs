//! Mapping between viewport coordinates and source pixels.
//!
//! The displayed image is placed with its centre at the viewport centre,
//! displaced by `offset`, then scaled by `zoom` about that same centre:
//!
//! ```text
//! screen = offset + zoom * (rendered - rendered_size / 2)
//! ```
//!
//! where `rendered = source * fit_scale` (contain fit) and `screen` is
//! relative to the viewport centre. The preview renderer and the crop
//! resolver both sample through [`ViewTransform::viewport_to_source`], so the
//! two cannot disagree about which source pixel sits under a viewport point.

use super::state::{Point, TransformState};
use crate::decode::{contain_fit, ContainFit};

/// Resolved affine mapping for one source image, viewport and transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    fit: ContainFit,
    zoom: f64,
    offset: Point,
}

impl ViewTransform {
    /// Build the mapping for a `source_width x source_height` image shown in
    /// a square viewport of side `viewport_side`.
    pub fn new(
        source_width: u32,
        source_height: u32,
        viewport_side: f64,
        state: &TransformState,
    ) -> Self {
        Self {
            fit: contain_fit(source_width, source_height, viewport_side),
            zoom: state.zoom,
            offset: state.offset,
        }
    }

    /// Source coordinate under viewport point `(u, v)`, both measured from
    /// the viewport centre. Pixel centres are at `i + 0.5` in source space.
    #[inline]
    pub fn viewport_to_source(&self, u: f64, v: f64) -> (f64, f64) {
        let rx = (u - self.offset.x) / self.zoom + self.fit.rendered_width / 2.0;
        let ry = (v - self.offset.y) / self.zoom + self.fit.rendered_height / 2.0;
        (rx / self.fit.scale, ry / self.fit.scale)
    }

    /// Viewport point (from the centre) where source coordinate `(x, y)` appears.
    pub fn source_to_viewport(&self, x: f64, y: f64) -> (f64, f64) {
        let rx = x * self.fit.scale - self.fit.rendered_width / 2.0;
        let ry = y * self.fit.scale - self.fit.rendered_height / 2.0;
        (
            self.offset.x + self.zoom * rx,
            self.offset.y + self.zoom * ry,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(zoom: f64, x: f64, y: f64) -> TransformState {
        TransformState {
            zoom,
            offset: Point::new(x, y),
        }
    }

    fn assert_close(a: (f64, f64), b: (f64, f64)) {
        assert!(
            (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_identity_centre_maps_to_source_centre() {
        let view = ViewTransform::new(400, 300, 256.0, &TransformState::IDENTITY);
        assert_close(view.viewport_to_source(0.0, 0.0), (200.0, 150.0));
    }

    #[test]
    fn test_identity_landscape_extent() {
        let view = ViewTransform::new(400, 300, 256.0, &TransformState::IDENTITY);

        // Contain fit: the full width spans the viewport
        assert_close(view.viewport_to_source(-128.0, 0.0), (0.0, 150.0));
        assert_close(view.viewport_to_source(128.0, 0.0), (400.0, 150.0));

        // ...and the 192px-high image leaves bands above and below
        assert_close(view.viewport_to_source(0.0, -96.0), (200.0, 0.0));
        assert_close(view.viewport_to_source(0.0, 96.0), (200.0, 300.0));
    }

    #[test]
    fn test_zoom_is_centre_anchored() {
        // Zooming must not move the apparent pan position
        let panned = ViewTransform::new(300, 300, 256.0, &state(1.0, 20.0, -10.0));
        let zoomed = ViewTransform::new(300, 300, 256.0, &state(2.5, 20.0, -10.0));

        assert_close(
            panned.viewport_to_source(20.0, -10.0),
            zoomed.viewport_to_source(20.0, -10.0),
        );
        assert_close(zoomed.viewport_to_source(20.0, -10.0), (150.0, 150.0));
    }

    #[test]
    fn test_zoom_two_halves_visible_extent() {
        let one = ViewTransform::new(300, 300, 256.0, &state(1.0, 0.0, 0.0));
        let two = ViewTransform::new(300, 300, 256.0, &state(2.0, 0.0, 0.0));

        let span_one = one.viewport_to_source(75.0, 0.0).0 - one.viewport_to_source(-75.0, 0.0).0;
        let span_two = two.viewport_to_source(75.0, 0.0).0 - two.viewport_to_source(-75.0, 0.0).0;

        assert!((span_two - span_one / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_translates_content() {
        let view = ViewTransform::new(300, 300, 256.0, &state(1.0, 20.0, -10.0));

        // The source centre now appears at the offset
        assert_close(view.source_to_viewport(150.0, 150.0), (20.0, -10.0));
        assert_close(view.viewport_to_source(20.0, -10.0), (150.0, 150.0));
    }

    #[test]
    fn test_roundtrip_mapping() {
        let view = ViewTransform::new(640, 480, 256.0, &state(1.8, -33.0, 12.5));
        let (u, v) = view.source_to_viewport(100.25, 377.5);
        assert_close(view.viewport_to_source(u, v), (100.25, 377.5));
    }
}
