//! OEE PRO WASM - WebAssembly bindings for OEE PRO
//!
//! This crate exposes the oeepro-core functionality to the dashboard's
//! JavaScript/TypeScript front end.
//!
//! # Module Structure
//!
//! - `cropper` - Circular photo cropper used on the registration screen
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding bindings
//! - `encode` - JPEG encoding and data URI bindings
//! - `metrics` - OEE, Pareto and downtime helpers for the dashboards
//! - `access` - Role and permission lookups
//! - `poll` - Account-approval poller for the waiting screen
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper } from '@oeepro/wasm';
//!
//! await init();
//!
//! const cropper = new JsCropper();
//! cropper.open(new Uint8Array(await file.arrayBuffer()));
//! ctx.putImageData(new ImageData(
//!   new Uint8ClampedArray(cropper.preview()), cropper.viewport_size), 0, 0);
//! const photo = cropper.commit(); // "data:image/jpeg;base64,..."
//! ```

use std::fmt::Display;

use wasm_bindgen::prelude::*;

mod access;
mod cropper;
mod decode;
mod encode;
mod metrics;
mod poll;
mod types;

// Re-export public types
pub use access::{role_can, role_permissions};
pub use cropper::JsCropper;
pub use decode::{decode_image, downscale_image};
pub use encode::{encode_jpeg, jpeg_data_uri};
pub use metrics::{compute_oee, downtime_minutes, pareto, summarize_downtime, vital_few};
pub use poll::JsApprovalPoller;
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Convert an error to a `JsValue` and report it on the browser console.
pub(crate) fn js_error<E: Display>(err: E) -> JsValue {
    let value = JsValue::from_str(&err.to_string());
    web_sys::console::warn_1(&value);
    value
}
