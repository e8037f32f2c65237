//! Source image loading for the photo cropper.
//!
//! This module provides functionality for:
//! - Decoding user-selected image bytes (any enabled raster format)
//! - Applying EXIF orientation so the bitmap is upright
//! - Contain-fit geometry for the cropper viewport
//! - Optional downscaling of oversized sources to a working copy
//!
//! All operations are synchronous and single-threaded within WASM.

mod fit;
mod load;
mod types;

pub use fit::{contain_fit, downscale_to_fit, ContainFit};
pub use load::{load_image, load_image_with_limit, DEFAULT_MAX_SOURCE_PIXELS};
pub use types::{DecodeError, DecodedImage, Orientation};
