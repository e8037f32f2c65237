//! Image encoding WASM bindings.
//!
//! - [`encode_jpeg`] - Encode RGB pixel data to JPEG bytes
//! - [`jpeg_data_uri`] - Encode RGB pixel data straight to a JPEG data URI
//!
//! ```typescript
//! const uri = jpeg_data_uri(pixels, 150, 150, 80);
//! form.photo = uri;
//! ```

use oeepro_core::encode;
use wasm_bindgen::prelude::*;

use crate::js_error;

/// Encode RGB pixel data (3 bytes per pixel) to JPEG bytes. `quality` is
/// clamped to 1-100.
///
/// # Errors
///
/// Returns an error if a dimension is zero or the pixel data length doesn't
/// match width * height * 3.
#[wasm_bindgen]
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality).map_err(js_error)
}

/// Encode RGB pixel data to a `data:image/jpeg;base64,...` string.
#[wasm_bindgen]
pub fn jpeg_data_uri(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<String, JsValue> {
    encode::encode_jpeg(pixels, width, height, quality)
        .map(|jpeg| encode::jpeg_data_uri(&jpeg))
        .map_err(js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_ok() {
        let pixels = vec![128u8; 10 * 10 * 3];
        let jpeg = encode_jpeg(&pixels, 10, 10, 80).ok().unwrap();
        // JPEG magic bytes
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_jpeg_clamps_quality() {
        let pixels = vec![90u8; 8 * 8 * 3];
        assert!(encode_jpeg(&pixels, 8, 8, 0).is_ok());
        assert!(encode_jpeg(&pixels, 8, 8, 255).is_ok());
    }

    #[test]
    fn test_jpeg_data_uri_ok() {
        let pixels = vec![64u8; 8 * 8 * 3];
        let uri = jpeg_data_uri(&pixels, 8, 8, 80).ok().unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }
}
