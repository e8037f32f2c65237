//! Zoom/pan transform for the photo cropper.
//!
//! # Coordinate System
//!
//! - Viewport coordinates are in display pixels measured from the viewport
//!   centre, +x right, +y down
//! - Source coordinates are in source pixels from the top-left corner, with
//!   pixel centres at `i + 0.5`
//! - `zoom` scales about the displayed image centre; `offset` translates it
//!
//! The transform is applied as translate-then-scale about the image centre,
//! so changing zoom never moves the apparent pan position.

mod sample;
mod state;
mod view;

pub use sample::{sample, sample_bilinear, sample_nearest, InterpolationFilter};
pub use state::{Point, TransformController, TransformState, ZoomRange};
pub use view::ViewTransform;
