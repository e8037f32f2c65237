//! Backend message shapes.
//!
//! Every backend response is wrapped in `{status, message?, data?}`. The
//! transport itself belongs to the host.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::{parse_data_uri, DataUriError, JPEG_MIME};

/// Errors from interpreting a backend response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with `status: "error"`.
    #[error("Backend error: {0}")]
    Backend(String),

    /// A success envelope arrived without the expected payload.
    #[error("Response has no data")]
    MissingData,

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Photo is not a base64 data URI: {0}")]
    PhotoEncoding(#[from] DataUriError),

    #[error("Photo must be a JPEG image")]
    InvalidPhoto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// The response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            message: None,
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ApiStatus::Success
    }

    /// The payload of a success envelope.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self.status {
            ApiStatus::Success => self.data.ok_or(ApiError::MissingData),
            ApiStatus::Error => Err(ApiError::Backend(
                self.message.unwrap_or_else(|| "unknown error".to_string()),
            )),
        }
    }
}

/// Parse a JSON response body and unwrap its payload.
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<ApiResponse<T>>(body)?.into_result()
}

/// Parse a response whose payload is irrelevant, such as an acknowledgement.
pub fn parse_ack(body: &str) -> Result<Option<String>, ApiError> {
    let response: ApiResponse<serde_json::Value> = serde_json::from_str(body)?;
    match response.status {
        ApiStatus::Success => Ok(response.message),
        ApiStatus::Error => Err(ApiError::Backend(
            response.message.unwrap_or_else(|| "unknown error".to_string()),
        )),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// A new account request. The account starts pending until an admin
/// reviews it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Cropped profile photo, `data:image/jpeg;base64,...`.
    pub photo: String,
}

impl RegistrationRequest {
    /// Check the photo field carries a base64 JPEG data URI whose payload
    /// starts with the JPEG SOI marker.
    pub fn validate(&self) -> Result<(), ApiError> {
        let (mime, bytes) = parse_data_uri(&self.photo)?;
        if mime == JPEG_MIME && bytes.starts_with(&JPEG_SOI) {
            Ok(())
        } else {
            Err(ApiError::InvalidPhoto)
        }
    }

    pub fn to_json(&self) -> Result<String, ApiError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }
}
