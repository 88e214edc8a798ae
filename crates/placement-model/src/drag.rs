//! Pointer drag gestures.
//!
//! A drag never accumulates per-event deltas. The offset is recomputed from
//! the gesture's anchor on every move, so the result depends only on where
//! the pointer is now, not on how many move events got there.

use crate::geometry::{Point2D, ScaleRatio};

/// Snapshot taken when a drag begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    /// Pointer position at drag start, in display units.
    pub pointer: Point2D,
    /// Image offset at drag start, in canvas pixels.
    pub offset: Point2D,
}

impl DragAnchor {
    pub fn new(pointer: Point2D, offset: Point2D) -> Self {
        Self { pointer, offset }
    }

    /// Offset for the pointer's current display position.
    pub fn offset_at(&self, pointer: Point2D, ratio: ScaleRatio) -> Point2D {
        let (dx, dy) = pointer.delta_from(&self.pointer);
        let (dx, dy) = ratio.apply(dx, dy);
        Point2D::new(self.offset.x + dx, self.offset.y + dy)
    }
}
