//! Crop resolver: bakes the current view into the fixed-size avatar raster.
//!
//! Output pixel centre `o` (measured from the raster centre) is scaled by
//! `D / S` into viewport units and then mapped through the same
//! [`ViewTransform`] as the preview. The circle of diameter `S` fills the
//! raster; pixels outside it are transparent. Inside the circle, areas the
//! image does not cover take the backdrop colour, as in the preview.

use super::config::CropperConfig;
use crate::decode::DecodedImage;
use crate::encode::{encode_rgba_jpeg, EncodeError};
use crate::mask::CircleMask;
use crate::transform::{sample, TransformState, ViewTransform};

/// Circularly clipped square raster produced on commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    /// Side of the square raster in pixels.
    pub size: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub rgba: Vec<u8>,
}

impl CroppedImage {
    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y as usize) * (self.size as usize) + x as usize) * 4;
        [
            self.rgba[idx],
            self.rgba[idx + 1],
            self.rgba[idx + 2],
            self.rgba[idx + 3],
        ]
    }

    /// Encode as JPEG, flattening transparency onto `background`.
    pub fn to_jpeg(&self, quality: u8, background: [u8; 3]) -> Result<Vec<u8>, EncodeError> {
        encode_rgba_jpeg(&self.rgba, self.size, self.size, quality, background)
    }
}

/// Produce the `S x S` circular crop of `image` at `state`.
pub fn resolve_crop(
    image: &DecodedImage,
    state: &TransformState,
    config: &CropperConfig,
) -> CroppedImage {
    let geometry = config.viewport;
    let size = geometry.output_size;
    let half = size as f64 / 2.0;
    let to_viewport = geometry.output_to_viewport_scale();
    let view = ViewTransform::new(image.width, image.height, geometry.viewport_size as f64, state);
    let clip = CircleMask::centered(size, size as f64);

    let mut rgba = vec![0u8; (size as usize) * (size as usize) * 4];

    for oy in 0..size {
        let v = (oy as f64 + 0.5 - half) * to_viewport;
        for ox in 0..size {
            if !clip.contains_pixel(ox, oy) {
                continue;
            }
            let u = (ox as f64 + 0.5 - half) * to_viewport;

            let (sx, sy) = view.viewport_to_source(u, v);
            let px = match sample(image, sx, sy, config.filter) {
                Some([r, g, b]) => [r, g, b, 255],
                None => config.backdrop,
            };
            let idx = ((oy as usize) * (size as usize) + ox as usize) * 4;
            rgba[idx..idx + 4].copy_from_slice(&px);
        }
    }

    CroppedImage { size, rgba }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cropper::preview::render_preview;
    use crate::transform::Point;

    /// Each pixel encodes its own position so misplaced samples show up.
    fn coordinate_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn state(zoom: f64, x: f64, y: f64) -> TransformState {
        TransformState {
            zoom,
            offset: Point::new(x, y),
        }
    }

    fn nearest_config() -> CropperConfig {
        let mut config = CropperConfig::default();
        config.filter = crate::transform::InterpolationFilter::Nearest;
        config
    }

    #[test]
    fn test_output_shape_and_transparent_corners() {
        let config = CropperConfig::default();
        let out = resolve_crop(&coordinate_image(400, 300), &TransformState::IDENTITY, &config);

        assert_eq!(out.size, 150);
        assert_eq!(out.rgba.len(), 150 * 150 * 4);
        for (x, y) in [(0, 0), (149, 0), (0, 149), (149, 149)] {
            assert_eq!(out.pixel(x, y)[3], 0, "corner ({x}, {y}) must be transparent");
        }
        assert_eq!(out.pixel(75, 75)[3], 255);
    }

    #[test]
    fn test_centered_crop_of_landscape_image() {
        // 400x300 contain-fits as 256x192 (scale 0.64). The 150px circle
        // covers 150 / 0.64 = 234.375 source pixels around the centre.
        let config = nearest_config();
        let out = resolve_crop(&coordinate_image(400, 300), &TransformState::IDENTITY, &config);

        // Centre pixel: u = 0.5 -> source x = (0.5 + 128) / 0.64 = 200.78
        assert_eq!(out.pixel(75, 75)[0], 200);
        assert_eq!(out.pixel(75, 75)[1], 150);

        // Left edge of the circle at mid-height: u = -74.5 -> x = 83.59
        assert_eq!(out.pixel(0, 75)[0], 83);
        // Right edge: u = 74.5 -> x = 316.4 (stored modulo 256)
        assert_eq!(out.pixel(149, 75)[0], (316 % 256) as u8);
    }

    #[test]
    fn test_zoom_two_shows_half_extent() {
        let config = nearest_config();
        let img = coordinate_image(300, 300);
        let one = resolve_crop(&img, &state(1.0, 0.0, 0.0), &config);
        let two = resolve_crop(&img, &state(2.0, 0.0, 0.0), &config);

        let span = |c: &CroppedImage| c.pixel(149, 75)[0] as i32 - c.pixel(0, 75)[0] as i32;
        let (s1, s2) = (span(&one), span(&two));

        // zoom 1 spans ~174 source px, zoom 2 spans ~87
        assert!((s1 - 2 * s2).abs() <= 2, "spans {s1} vs {s2}");
        // Both centred on the source centre
        assert_eq!(two.pixel(75, 75)[0], 150);
    }

    #[test]
    fn test_panned_out_of_frame_shows_backdrop() {
        let config = CropperConfig::default();
        let img = coordinate_image(100, 100);
        let panned = state(1.0, 1000.0, 0.0);
        let out = resolve_crop(&img, &panned, &config);

        assert_eq!(out.pixel(75, 75), config.backdrop);
        assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);

        // Same colour the preview shows at that spot
        let preview = render_preview(&img, &panned, &config);
        assert_eq!(preview.pixel(75 + 53, 75 + 53), out.pixel(75, 75));
    }

    #[test]
    fn test_backdrop_survives_jpeg_flattening() {
        let config = CropperConfig::default();
        let out = resolve_crop(&coordinate_image(100, 100), &state(1.0, 1000.0, 0.0), &config);
        let jpeg = out.to_jpeg(100, config.background).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap().into_rgb8();

        let centre = decoded.get_pixel(75, 75).0;
        let corner = decoded.get_pixel(0, 0).0;
        for i in 0..3 {
            assert!((centre[i] as i32 - config.backdrop[i] as i32).abs() <= 3);
            assert!(corner[i] <= 3);
        }
    }

    #[test]
    fn test_output_matches_preview_inside_circle() {
        let config = CropperConfig::default();
        let img = coordinate_image(640, 480);
        let view_state = state(1.7, 20.0, -10.0);

        let preview = render_preview(&img, &view_state, &config);
        let out = resolve_crop(&img, &view_state, &config);

        let inset = (config.viewport.viewport_size - config.viewport.mask_diameter) / 2;
        for oy in 0..out.size {
            for ox in 0..out.size {
                let o = out.pixel(ox, oy);
                if o[3] == 0 {
                    continue;
                }
                assert_eq!(preview.pixel(ox + inset, oy + inset), o, "mismatch at ({ox}, {oy})");
            }
        }
    }

    #[test]
    fn test_drag_scenario_applies_identically() {
        // Drag (100,100) -> (120,90) gives offset (20,-10)
        let config = nearest_config();
        let img = coordinate_image(300, 300);
        let dragged = state(1.0, 20.0, -10.0);

        let out = resolve_crop(&img, &dragged, &config);
        let preview = render_preview(&img, &dragged, &config);

        // The source centre appears 20px right and 10px up of the circle centre
        let view = ViewTransform::new(300, 300, 256.0, &dragged);
        let (u, v) = view.source_to_viewport(150.5, 150.5);
        assert!((u - 20.0 - 0.5 * 256.0 / 300.0).abs() < 1e-9);
        assert!((v + 10.0 - 0.5 * 256.0 / 300.0).abs() < 1e-9);

        assert_eq!(out.pixel(95, 65), preview.pixel(95 + 53, 65 + 53));
        assert_eq!(out.pixel(95, 65)[0], 150);
        assert_eq!(out.pixel(95, 65)[1], 150);
    }

    #[test]
    fn test_larger_output_resamples_same_region() {
        let mut config = nearest_config();
        config.viewport.output_size = 300;
        let img = coordinate_image(300, 300);
        let out = resolve_crop(&img, &TransformState::IDENTITY, &config);

        assert_eq!(out.size, 300);
        // Same centre and same circle edge as the 150px output, at twice the resolution
        assert_eq!(out.pixel(150, 150)[0], 150);
        let small = resolve_crop(&img, &TransformState::IDENTITY, &nearest_config());
        assert!((out.pixel(0, 150)[0] as i32 - small.pixel(0, 75)[0] as i32).abs() <= 1);
    }

    #[test]
    fn test_to_jpeg() {
        let config = CropperConfig::default();
        let out = resolve_crop(&coordinate_image(200, 200), &TransformState::IDENTITY, &config);
        let jpeg = out.to_jpeg(80, [0, 0, 0]).unwrap();

        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::cropper::preview::render_preview;
    use crate::transform::Point;
    use proptest::prelude::*;

    fn noise_image(width: u32, height: u32, seed: u32) -> DecodedImage {
        let pixels = (0..width * height * 3)
            .map(|i| (i.wrapping_mul(2654435761).wrapping_add(seed) >> 24) as u8)
            .collect();
        DecodedImage::new(width, height, pixels)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// Property: every visible output pixel equals the preview pixel above it.
        #[test]
        fn prop_output_matches_preview(
            (width, height) in (8u32..=200, 8u32..=200),
            zoom in 1.0f64..=3.0,
            offset in (-150.0f64..150.0, -150.0f64..150.0),
            seed in any::<u32>(),
        ) {
            let config = CropperConfig::default();
            let img = noise_image(width, height, seed);
            let view_state = TransformState { zoom, offset: Point::new(offset.0, offset.1) };

            let preview = render_preview(&img, &view_state, &config);
            let out = resolve_crop(&img, &view_state, &config);

            for oy in (0..out.size).step_by(7) {
                for ox in (0..out.size).step_by(7) {
                    let o = out.pixel(ox, oy);
                    if o[3] == 0 {
                        continue;
                    }
                    prop_assert_eq!(preview.pixel(ox + 53, oy + 53), o);
                }
            }
        }

        /// Property: output is always S x S with transparent corners.
        #[test]
        fn prop_output_shape(
            (width, height) in (1u32..=64, 1u32..=64),
            zoom in 1.0f64..=3.0,
        ) {
            let config = CropperConfig::default();
            let img = noise_image(width, height, 7);
            let out = resolve_crop(&img, &TransformState { zoom, offset: Point::ORIGIN }, &config);

            prop_assert_eq!(out.size, 150);
            prop_assert_eq!(out.rgba.len(), 150 * 150 * 4);
            prop_assert_eq!(out.pixel(0, 0)[3], 0);
            prop_assert_eq!(out.pixel(149, 149)[3], 0);
        }
    }
}
