//! Image decoding WASM bindings.
//!
//! - [`decode_image`] - Decode any supported raster format, EXIF-upright
//! - [`downscale_image`] - Shrink an image so its longer edge fits a bound
//!
//! ```typescript
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const small = downscale_image(image, 1024);
//! ```

use crate::js_error;
use crate::types::JsDecodedImage;
use oeepro_core::decode;
use wasm_bindgen::prelude::*;

/// Decode image bytes (JPEG, PNG, WebP, GIF or BMP) to RGB.
///
/// JPEG input has its EXIF orientation applied. Images above the default
/// pixel budget are rejected.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::load_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}

/// Downscale so the longer edge is at most `max_edge`. Images already
/// within the bound are returned unchanged.
#[wasm_bindgen]
pub fn downscale_image(image: &JsDecodedImage, max_edge: u32) -> Result<JsDecodedImage, JsValue> {
    decode::downscale_to_fit(&image.to_decoded(), max_edge)
        .map(JsDecodedImage::from_decoded)
        .map_err(js_error)
}
