//! Circular photo cropper used during user registration.
//!
//! # Components
//!
//! - `config` - viewport geometry, zoom range and output settings
//! - `preview` - live viewport rendering with the dimmed area outside the circle
//! - `resolve` - the `S x S` circular crop baked on commit
//! - `session` - the [`Cropper`] owning at most one [`CropSession`]
//!
//! Preview and resolver share one coordinate mapping
//! ([`crate::transform::ViewTransform`]) and one sampler, so the committed
//! avatar is exactly what the user saw inside the circle.

pub mod config;
pub mod preview;
pub mod resolve;
pub mod session;

pub use config::{ConfigError, CropperConfig, ViewportSpec, MAX_RASTER_SIZE};
pub use preview::{render_preview, PreviewFrame};
pub use resolve::{resolve_crop, CroppedImage};
pub use session::{CommittedPhoto, CropError, CropSession, Cropper};
