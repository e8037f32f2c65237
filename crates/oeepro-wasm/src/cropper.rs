//! Circular photo cropper bindings.
//!
//! `JsCropper` owns at most one crop session. The front end forwards
//! pointer and slider events, paints `preview()` into a canvas after each
//! change and calls `commit()` when the user confirms.
//!
//! ```typescript
//! const cropper = JsCropper.with_config({ jpeg_quality: 90 });
//! cropper.open(bytes);
//! canvas.onpointerdown = (e) => cropper.begin_drag(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => cropper.continue_drag(e.offsetX, e.offsetY) && redraw();
//! window.onpointerup = () => cropper.end_drag();
//! slider.oninput = () => { cropper.set_zoom(+slider.value); redraw(); };
//! ```

use oeepro_core::cropper::{Cropper, CropperConfig};
use wasm_bindgen::prelude::*;

use crate::js_error;
use crate::types::JsDecodedImage;

#[wasm_bindgen]
pub struct JsCropper {
    inner: Cropper,
}

impl Default for JsCropper {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsCropper {
    /// Cropper with the standard 256px viewport, 150px circle and 150px output.
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCropper {
        JsCropper {
            inner: Cropper::default(),
        }
    }

    /// Cropper from a (partial) `CropperConfig` object. Missing fields take
    /// their defaults.
    pub fn with_config(config: JsValue) -> Result<JsCropper, JsValue> {
        let config: CropperConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| js_error(format!("Invalid cropper config: {e}")))?;
        Cropper::new(config)
            .map(|inner| JsCropper { inner })
            .map_err(js_error)
    }

    /// The active configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config()).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn viewport_size(&self) -> u32 {
        self.inner.config().viewport.viewport_size
    }

    #[wasm_bindgen(getter)]
    pub fn mask_diameter(&self) -> u32 {
        self.inner.config().viewport.mask_diameter
    }

    #[wasm_bindgen(getter)]
    pub fn output_size(&self) -> u32 {
        self.inner.config().viewport.output_size
    }

    #[wasm_bindgen(getter)]
    pub fn has_session(&self) -> bool {
        self.inner.has_session()
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.session().is_some_and(|s| s.is_dragging())
    }

    /// Current zoom, `undefined` without a session.
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> Option<f64> {
        self.inner.transform().map(|t| t.zoom)
    }

    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> Option<f64> {
        self.inner.offset().map(|p| p.x)
    }

    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> Option<f64> {
        self.inner.offset().map(|p| p.y)
    }

    /// Start a session from file bytes. On failure any previous session is
    /// kept.
    pub fn open(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.open(bytes).map_err(js_error)
    }

    /// Start a session from an already decoded image.
    pub fn open_image(&mut self, image: &JsDecodedImage) -> Result<(), JsValue> {
        self.inner.open_image(image.to_decoded()).map_err(js_error)
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.inner.begin_drag(x, y);
    }

    /// Returns true when the offset changed and the preview needs a redraw.
    pub fn continue_drag(&mut self, x: f64, y: f64) -> bool {
        self.inner.continue_drag(x, y)
    }

    pub fn end_drag(&mut self) {
        self.inner.end_drag();
    }

    /// Set the zoom; values outside the range are clamped.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.inner.set_zoom(zoom);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// RGBA pixels of the viewport (`viewport_size` squared), ready for
    /// `ImageData`. `undefined` without a session.
    pub fn preview(&self) -> Option<Vec<u8>> {
        self.inner.preview().map(|frame| frame.pixels)
    }

    /// Resolve the crop and return the JPEG data URI. Ends the session.
    pub fn commit(&mut self) -> Result<String, JsValue> {
        self.inner
            .commit()
            .map(|photo| photo.data_uri)
            .map_err(js_error)
    }

    /// Discard the session without output.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }
}
