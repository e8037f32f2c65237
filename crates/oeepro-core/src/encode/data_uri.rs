//! Base64 data URIs for transporting encoded images inside JSON fields.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// MIME type of the committed avatar.
pub const JPEG_MIME: &str = "image/jpeg";

/// Errors from parsing a data URI.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("Not a data URI")]
    MissingScheme,

    #[error("Data URI is not base64-encoded")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// Build `data:<mime>;base64,<payload>` from raw bytes.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Build a JPEG data URI.
pub fn jpeg_data_uri(bytes: &[u8]) -> String {
    to_data_uri(JPEG_MIME, bytes)
}

/// Split a base64 data URI into its MIME type and decoded bytes.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>), DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingScheme)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(DataUriError::NotBase64)?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| DataUriError::InvalidPayload(e.to_string()))?;
    Ok((mime.to_string(), bytes))
}
