//! Zoom/pan transform state and the drag controller that mutates it.
//!
//! `zoom` scales the source about the viewport centre and is always held
//! inside its configured range. `offset` translates in viewport pixels and is
//! deliberately unconstrained: the user may pan the image out of frame.

use serde::{Deserialize, Serialize};

/// A 2D point or displacement in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Allowed zoom interval and slider step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
    /// Slider granularity. Informational for the host UI; `clamp` does not snap.
    pub step: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 3.0,
            step: 0.1,
        }
    }
}

impl ZoomRange {
    /// Clamp `z` into the range. Non-finite input maps to `min`.
    pub fn clamp(&self, z: f64) -> f64 {
        if z.is_finite() {
            z.clamp(self.min, self.max)
        } else {
            self.min
        }
    }

    /// Check that the range is usable (finite, ordered, min >= 1).
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.min >= 1.0
            && self.min <= self.max
            && self.step > 0.0
    }
}

/// Current zoom and pan of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub zoom: f64,
    pub offset: Point,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformState {
    pub const IDENTITY: TransformState = TransformState {
        zoom: 1.0,
        offset: Point::ORIGIN,
    };
}

/// Translates pointer/touch and slider input into transform updates.
#[derive(Debug, Clone, Default)]
pub struct TransformController {
    state: TransformState,
    zoom_range: ZoomRange,
    /// Set while a drag is active: pointer position minus offset at drag start.
    drag_anchor: Option<Point>,
}

impl TransformController {
    /// Create a controller at the identity transform.
    pub fn new(zoom_range: ZoomRange) -> Self {
        Self {
            state: TransformState::IDENTITY,
            zoom_range,
            drag_anchor: None,
        }
    }

    pub fn state(&self) -> TransformState {
        self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn offset(&self) -> Point {
        self.state.offset
    }

    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Start a drag at the given pointer position.
    ///
    /// A second `begin_drag` without `end_drag` re-anchors at the new position.
    pub fn begin_drag(&mut self, pointer_x: f64, pointer_y: f64) {
        self.drag_anchor = Some(Point::new(
            pointer_x - self.state.offset.x,
            pointer_y - self.state.offset.y,
        ));
    }

    /// Move the image with the pointer. Ignored when no drag is active.
    ///
    /// Returns `true` if the offset changed.
    pub fn continue_drag(&mut self, pointer_x: f64, pointer_y: f64) -> bool {
        let Some(anchor) = self.drag_anchor else {
            return false;
        };
        let offset = Point::new(pointer_x - anchor.x, pointer_y - anchor.y);
        let changed = offset != self.state.offset;
        self.state.offset = offset;
        changed
    }

    /// Finish the current drag. Idempotent.
    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Set the zoom, clamped into the configured range.
    pub fn set_zoom(&mut self, z: f64) {
        self.state.zoom = self.zoom_range.clamp(z);
    }

    /// Restore the identity transform and end any drag.
    pub fn reset(&mut self) {
        self.state = TransformState::IDENTITY;
        self.drag_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_controller_is_identity() {
        let ctl = TransformController::new(ZoomRange::default());
        assert_eq!(ctl.state(), TransformState::IDENTITY);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_drag_composition() {
        let mut ctl = TransformController::new(ZoomRange::default());
        ctl.begin_drag(10.0, 10.0);
        ctl.continue_drag(15.0, 15.0);

        assert_eq!(ctl.offset(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_drag_scenario_offset() {
        let mut ctl = TransformController::new(ZoomRange::default());
        ctl.begin_drag(100.0, 100.0);
        ctl.continue_drag(120.0, 90.0);
        ctl.end_drag();

        assert_eq!(ctl.offset(), Point::new(20.0, -10.0));
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_second_drag_continues_from_current_offset() {
        let mut ctl = TransformController::new(ZoomRange::default());
        ctl.begin_drag(0.0, 0.0);
        ctl.continue_drag(30.0, 40.0);
        ctl.end_drag();

        ctl.begin_drag(200.0, 200.0);
        ctl.continue_drag(190.0, 210.0);

        assert_eq!(ctl.offset(), Point::new(20.0, 50.0));
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut ctl = TransformController::new(ZoomRange::default());
        assert!(!ctl.continue_drag(50.0, 50.0));
        assert_eq!(ctl.offset(), Point::ORIGIN);

        ctl.begin_drag(0.0, 0.0);
        ctl.end_drag();
        assert!(!ctl.continue_drag(50.0, 50.0));
        assert_eq!(ctl.offset(), Point::ORIGIN);
    }

    #[test]
    fn test_end_drag_is_idempotent() {
        let mut ctl = TransformController::new(ZoomRange::default());
        ctl.end_drag();
        ctl.end_drag();
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_drag_is_independent_of_zoom() {
        let mut ctl = TransformController::new(ZoomRange::default());
        ctl.set_zoom(2.5);
        ctl.begin_drag(10.0, 10.0);
        ctl.continue_drag(15.0, 15.0);

        assert_eq!(ctl.offset(), Point::new(5.0, 5.0));
        assert_eq!(ctl.zoom(), 2.5);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut ctl = TransformController::new(ZoomRange::default());

        ctl.set_zoom(10.0);
        assert_eq!(ctl.zoom(), 3.0);

        ctl.set_zoom(0.0);
        assert_eq!(ctl.zoom(), 1.0);

        ctl.set_zoom(1.7);
        assert_eq!(ctl.zoom(), 1.7);
    }

    #[test]
    fn test_zoom_non_finite() {
        let mut ctl = TransformController::new(ZoomRange::default());
        ctl.set_zoom(2.0);
        ctl.set_zoom(f64::NAN);
        assert_eq!(ctl.zoom(), 1.0);

        ctl.set_zoom(f64::INFINITY);
        assert_eq!(ctl.zoom(), 1.0);
    }

    #[test]
    fn test_reset_restores_identity_and_ends_drag() {
        let mut ctl = TransformController::new(ZoomRange::default());
        ctl.set_zoom(2.0);
        ctl.begin_drag(5.0, 5.0);
        ctl.continue_drag(50.0, -20.0);

        ctl.reset();

        assert_eq!(ctl.state(), TransformState::IDENTITY);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn test_zoom_range_validity() {
        assert!(ZoomRange::default().is_valid());
        assert!(!ZoomRange {
            min: 2.0,
            max: 1.5,
            step: 0.1
        }
        .is_valid());
        assert!(!ZoomRange {
            min: 0.5,
            max: 3.0,
            step: 0.1
        }
        .is_valid());
        assert!(!ZoomRange {
            min: 1.0,
            max: 3.0,
            step: 0.0
        }
        .is_valid());
    }
}
