//! Image encoding for the committed avatar.
//!
//! This module provides functionality for:
//! - Encoding RGB or RGBA rasters to JPEG with configurable quality
//! - Wrapping encoded bytes as base64 data URIs for JSON transport
//!
//! All operations are synchronous and single-threaded within WASM.

mod data_uri;
mod jpeg;

pub use data_uri::{jpeg_data_uri, parse_data_uri, to_data_uri, DataUriError, JPEG_MIME};
pub use jpeg::{encode_jpeg, encode_rgba_jpeg, flatten_rgba, EncodeError};
