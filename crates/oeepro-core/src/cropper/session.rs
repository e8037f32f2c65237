//! Crop session lifecycle.
//!
//! ```text
//! [no session] --(file selected)--> [editing, zoom=1, offset=0]
//! [editing] --(drag / slider)--> [editing]
//! [editing] --(cancel)--> [no session]
//! [editing] --(commit)--> [no session]   (emits output)
//! ```
//!
//! A [`Cropper`] owns at most one [`CropSession`]. Opening a new file
//! replaces the current session; input events without a session are ignored.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::config::{ConfigError, CropperConfig};
use super::preview::{render_preview, PreviewFrame};
use super::resolve::{resolve_crop, CroppedImage};
use crate::decode::{downscale_to_fit, load_image_with_limit, DecodeError, DecodedImage};
use crate::encode::{jpeg_data_uri, EncodeError};
use crate::transform::{Point, TransformController, TransformState};

/// Errors surfaced by the cropper.
#[derive(Debug, Error)]
pub enum CropError {
    /// Commit was requested with no image loaded.
    #[error("No active crop session")]
    NoActiveSession,

    /// The selected file could not be decoded.
    #[error("Failed to load image: {0}")]
    Load(#[from] DecodeError),

    /// The output raster could not be encoded.
    #[error("Failed to encode crop: {0}")]
    Encode(#[from] EncodeError),

    /// The cropper configuration is invalid.
    #[error("Invalid cropper configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Source image plus the transform being edited.
#[derive(Debug, Clone)]
pub struct CropSession {
    source: DecodedImage,
    controller: TransformController,
}

impl CropSession {
    fn new(source: DecodedImage, config: &CropperConfig) -> Self {
        Self {
            source,
            controller: TransformController::new(config.zoom),
        }
    }

    pub fn source(&self) -> &DecodedImage {
        &self.source
    }

    pub fn transform(&self) -> TransformState {
        self.controller.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn begin_drag(&mut self, pointer_x: f64, pointer_y: f64) {
        self.controller.begin_drag(pointer_x, pointer_y);
    }

    pub fn continue_drag(&mut self, pointer_x: f64, pointer_y: f64) -> bool {
        self.controller.continue_drag(pointer_x, pointer_y)
    }

    pub fn end_drag(&mut self) {
        self.controller.end_drag();
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.controller.set_zoom(zoom);
    }

    pub fn reset(&mut self) {
        self.controller.reset();
    }
}

/// Final avatar produced by a commit.
#[derive(Debug, Clone)]
pub struct CommittedPhoto {
    /// Transform the photo was cropped at.
    pub transform: TransformState,
    /// Circularly clipped RGBA raster.
    pub image: CroppedImage,
    /// JPEG-encoded raster.
    pub jpeg: Vec<u8>,
    /// `data:image/jpeg;base64,...` for the registration form.
    pub data_uri: String,
}

/// Owner of the (at most one) active crop session.
#[derive(Debug, Clone)]
pub struct Cropper {
    config: CropperConfig,
    session: Option<CropSession>,
}

impl Default for Cropper {
    fn default() -> Self {
        Self {
            config: CropperConfig::default(),
            session: None,
        }
    }
}

impl Cropper {
    /// Create a cropper after validating `config`.
    pub fn new(config: CropperConfig) -> Result<Self, CropError> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected cropper configuration");
            return Err(e.into());
        }
        Ok(Self {
            config,
            session: None,
        })
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&CropSession> {
        self.session.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Decode `bytes` and start a fresh session at the identity transform.
    ///
    /// On failure the current session, if any, is left untouched.
    pub fn open(&mut self, bytes: &[u8]) -> Result<(), CropError> {
        let image = match load_image_with_limit(bytes, self.config.max_source_pixels) {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, len = bytes.len(), "failed to load source image");
                return Err(e.into());
            }
        };
        self.open_image(image)
    }

    /// Start a fresh session from an already decoded image.
    ///
    /// Images whose buffer does not match their dimensions are rejected
    /// and the current session, if any, is left untouched.
    pub fn open_image(&mut self, image: DecodedImage) -> Result<(), CropError> {
        if let Err(e) = image.validate() {
            warn!(error = %e, "rejected decoded source image");
            return Err(e.into());
        }

        let source = match self.config.working_max_edge {
            Some(edge) => downscale_to_fit(&image, edge)?,
            None => image,
        };

        if self.session.is_some() {
            debug!("replacing active crop session");
        }
        debug!(
            width = source.width,
            height = source.height,
            "crop session opened"
        );
        self.session = Some(CropSession::new(source, &self.config));
        Ok(())
    }

    /// Begin a drag. Ignored without a session.
    pub fn begin_drag(&mut self, pointer_x: f64, pointer_y: f64) {
        if let Some(session) = self.session.as_mut() {
            session.begin_drag(pointer_x, pointer_y);
        }
    }

    /// Continue a drag. Returns `true` if the offset changed.
    pub fn continue_drag(&mut self, pointer_x: f64, pointer_y: f64) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.continue_drag(pointer_x, pointer_y))
    }

    /// End a drag. Ignored without a session.
    pub fn end_drag(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.end_drag();
        }
    }

    /// Set the zoom (clamped). Ignored without a session.
    pub fn set_zoom(&mut self, zoom: f64) {
        if let Some(session) = self.session.as_mut() {
            session.set_zoom(zoom);
        }
    }

    /// Restore the identity transform. Ignored without a session.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
        }
    }

    /// Current transform, if a session is active.
    pub fn transform(&self) -> Option<TransformState> {
        self.session.as_ref().map(CropSession::transform)
    }

    /// Current pan offset, if a session is active.
    pub fn offset(&self) -> Option<Point> {
        self.transform().map(|t| t.offset)
    }

    /// Render the viewport for the current transform.
    pub fn preview(&self) -> Option<PreviewFrame> {
        self.session
            .as_ref()
            .map(|s| render_preview(&s.source, &s.transform(), &self.config))
    }

    /// Resolve, encode and end the session.
    ///
    /// If encoding fails the session is kept so the user can retry.
    pub fn commit(&mut self) -> Result<CommittedPhoto, CropError> {
        let session = self.session.as_ref().ok_or(CropError::NoActiveSession)?;
        let transform = session.transform();

        let image = resolve_crop(&session.source, &transform, &self.config);
        let jpeg = image.to_jpeg(self.config.jpeg_quality, self.config.background)?;
        let data_uri = jpeg_data_uri(&jpeg);

        self.session = None;
        info!(
            zoom = transform.zoom,
            offset_x = transform.offset.x,
            offset_y = transform.offset.y,
            bytes = jpeg.len(),
            "crop committed"
        );

        Ok(CommittedPhoto {
            transform,
            image,
            jpeg,
            data_uri,
        })
    }

    /// Discard the session without producing output.
    pub fn cancel(&mut self) {
        if self.session.take().is_some() {
            debug!("crop session cancelled");
        }
    }
}
