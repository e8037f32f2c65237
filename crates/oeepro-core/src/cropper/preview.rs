//! Live preview of the crop viewport.
//!
//! Renders the source into the square viewport at the current transform,
//! then dims everything outside the crop circle. Pixels inside the circle are
//! sampled exactly as the crop resolver samples them.

use super::config::CropperConfig;
use crate::decode::DecodedImage;
use crate::mask::CircleMask;
use crate::transform::{sample, TransformState, ViewTransform};

/// One rendered viewport frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    /// Side of the square frame in pixels.
    pub size: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl PreviewFrame {
    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.size as usize) + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// Render the viewport for `image` at `state`.
pub fn render_preview(
    image: &DecodedImage,
    state: &TransformState,
    config: &CropperConfig,
) -> PreviewFrame {
    let size = config.viewport.viewport_size;
    let half = size as f64 / 2.0;
    let view = ViewTransform::new(image.width, image.height, size as f64, state);
    let mask = CircleMask::centered(size, config.viewport.mask_diameter as f64);
    let vignette = &config.vignette;

    let mut pixels = vec![0u8; (size as usize) * (size as usize) * 4];

    for py in 0..size {
        let y = py as f64 + 0.5;
        let v = y - half;
        for px in 0..size {
            let x = px as f64 + 0.5;
            let u = x - half;

            let (sx, sy) = view.viewport_to_source(u, v);
            let base = match sample(image, sx, sy, config.filter) {
                Some([r, g, b]) => [r, g, b, 255],
                None => config.backdrop,
            };

            let weight = vignette.weight(mask.outside_distance(x, y));
            let out = if weight > 0.0 {
                overlay(base, vignette.color, weight)
            } else {
                base
            };

            let idx = ((py as usize) * (size as usize) + px as usize) * 4;
            pixels[idx..idx + 4].copy_from_slice(&out);
        }
    }

    PreviewFrame { size, pixels }
}

/// Composite a solid overlay with coverage `weight` over an RGBA pixel.
fn overlay(base: [u8; 4], color: [u8; 3], weight: f64) -> [u8; 4] {
    let w = weight.clamp(0.0, 1.0);
    let base_a = base[3] as f64 / 255.0;
    let out_a = w + base_a * (1.0 - w);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let v = (color[i] as f64 * w + base[i] as f64 * base_a * (1.0 - w)) / out_a;
        out[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Point;

    fn quadrants(size: u32) -> DecodedImage {
        // Red top-left, green top-right, blue bottom-left, white bottom-right
        let mut pixels = Vec::with_capacity((size * size * 3) as usize);
        for y in 0..size {
            for x in 0..size {
                let rgb = match (x < size / 2, y < size / 2) {
                    (true, true) => [255, 0, 0],
                    (false, true) => [0, 255, 0],
                    (true, false) => [0, 0, 255],
                    (false, false) => [255, 255, 255],
                };
                pixels.extend_from_slice(&rgb);
            }
        }
        DecodedImage::new(size, size, pixels)
    }

    #[test]
    fn test_frame_dimensions() {
        let config = CropperConfig::default();
        let frame = render_preview(&quadrants(64), &TransformState::IDENTITY, &config);

        assert_eq!(frame.size, 256);
        assert_eq!(frame.pixels.len(), 256 * 256 * 4);
    }

    #[test]
    fn test_circle_interior_is_undimmed() {
        let config = CropperConfig::default();
        let frame = render_preview(&quadrants(64), &TransformState::IDENTITY, &config);

        // Well inside the circle, top-left quadrant: pure red
        assert_eq!(frame.pixel(100, 100), [255, 0, 0, 255]);
        assert_eq!(frame.pixel(150, 150), [255, 255, 255, 255]);
    }

    #[test]
    fn test_outside_circle_is_dimmed() {
        let config = CropperConfig::default();
        let frame = render_preview(&quadrants(64), &TransformState::IDENTITY, &config);

        // Square source fills the viewport; the corner is white but dimmed
        let corner = frame.pixel(250, 250);
        assert!(corner[0] < 255);
        assert_eq!(corner[3], 255);
    }

    #[test]
    fn test_backdrop_where_no_content() {
        let mut config = CropperConfig::default();
        config.vignette.strength = 0.0;
        let wide = DecodedImage::filled(400, 100, [200, 200, 200]);
        let frame = render_preview(&wide, &TransformState::IDENTITY, &config);

        // 400x100 fits as 256x64; row 10 is above the image
        assert_eq!(frame.pixel(128, 10), config.backdrop);
        assert_eq!(frame.pixel(128, 128), [200, 200, 200, 255]);
    }

    #[test]
    fn test_offset_moves_content() {
        let mut config = CropperConfig::default();
        config.vignette.strength = 0.0;
        let state = TransformState {
            zoom: 1.0,
            offset: Point::new(64.0, 0.0),
        };
        let frame = render_preview(&quadrants(64), &state, &config);

        // Image shifted right by a quarter of the viewport: the left quarter
        // of the viewport now has no content.
        assert_eq!(frame.pixel(10, 100), config.backdrop);
        assert_eq!(frame.pixel(100, 100), [255, 0, 0, 255]);
    }

    #[test]
    fn test_overlay_on_transparent() {
        let out = overlay([0, 0, 0, 0], [10, 20, 30], 0.5);
        assert_eq!(out, [10, 20, 30, 128]);
    }

    #[test]
    fn test_overlay_on_opaque() {
        let out = overlay([200, 200, 200, 255], [0, 0, 0], 0.25);
        assert_eq!(out, [150, 150, 150, 255]);
    }
}
