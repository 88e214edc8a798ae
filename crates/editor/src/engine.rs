//! Placement engine: the mutable state behind the live editor.
//!
//! Every operation takes `&mut self` and runs to completion; the engine is
//! owned by exactly one editor session and never shared across threads.

use posterframe_common::error::PosterResult;
use posterframe_placement_model::drag::DragAnchor;
use posterframe_placement_model::geometry::{CanvasSize, DisplaySize, Point2D, ScaleRatio};
use posterframe_placement_model::placement::PlacementState;

/// Placement transform plus the drag gesture in progress.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    canvas: CanvasSize,
    display: DisplaySize,
    state: PlacementState,
    drag: Option<DragAnchor>,
    render_requested: bool,
}

impl PlacementEngine {
    /// Create an engine at the identity placement, displayed 1:1.
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            display: canvas.as_display(),
            state: PlacementState::IDENTITY,
            drag: None,
            render_requested: false,
        }
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    /// Current placement.
    pub fn placement(&self) -> &PlacementState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Display-to-intrinsic ratio at the current display size.
    pub fn ratio(&self) -> ScaleRatio {
        ScaleRatio::display_to_intrinsic(self.canvas, self.display)
    }

    /// Record the preview's new on-screen size.
    ///
    /// A drag in progress keeps its anchor; later moves use the new ratio.
    pub fn set_display_size(&mut self, size: DisplaySize) {
        tracing::debug!(
            width = size.width,
            height = size.height,
            "Preview display size changed"
        );
        self.display = size;
    }

    /// Start a drag at the given display position.
    ///
    /// Non-finite coordinates are ignored.
    pub fn begin_drag(&mut self, x: f64, y: f64) {
        if !(x.is_finite() && y.is_finite()) {
            tracing::debug!(x, y, "Ignoring drag start at non-finite position");
            return;
        }
        let offset = Point2D::new(self.state.offset_x, self.state.offset_y);
        self.drag = Some(DragAnchor::new(Point2D::new(x, y), offset));
    }

    /// Move the active drag. Returns false if no drag is active.
    pub fn update_drag(&mut self, x: f64, y: f64) -> bool {
        let Some(anchor) = self.drag else {
            return false;
        };
        if !(x.is_finite() && y.is_finite()) {
            tracing::debug!(x, y, "Ignoring drag move to non-finite position");
            return false;
        }
        let offset = anchor.offset_at(Point2D::new(x, y), self.ratio());
        self.state.offset_x = offset.x;
        self.state.offset_y = offset.y;
        self.request_render();
        true
    }

    /// Finish the active drag. Safe to call when not dragging.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Set the uniform scale. Invalid values leave the state untouched.
    pub fn set_scale(&mut self, value: f64) -> PosterResult<()> {
        self.state.set_scale(value)?;
        self.request_render();
        Ok(())
    }

    /// Rotate a further 90 degrees clockwise.
    pub fn rotate(&mut self) {
        self.state.rotate();
        self.request_render();
    }

    /// Back to centered, unscaled, unrotated in one step.
    ///
    /// The source image and user name are not touched.
    pub fn reset_placement(&mut self) {
        self.state.reset();
        self.request_render();
    }

    /// Drop the drag and restore the identity placement without asking
    /// for a render.
    pub fn clear(&mut self) {
        self.state.reset();
        self.drag = None;
        self.render_requested = false;
    }

    fn request_render(&mut self) {
        self.render_requested = true;
    }

    /// Consume the pending render request, if any.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posterframe_placement_model::placement::Rotation;

    fn scaled_engine() -> PlacementEngine {
        let mut engine = PlacementEngine::new(CanvasSize::PRINT);
        engine.set_display_size(DisplaySize::new(759.0, 600.0).unwrap());
        engine
    }

    #[test]
    fn test_move_without_drag_is_noop() {
        let mut engine = scaled_engine();
        assert!(!engine.update_drag(50.0, 50.0));
        assert!(engine.placement().is_identity());
        assert!(!engine.take_render_request());
    }

    #[test]
    fn test_drag_rescales_into_canvas_pixels() {
        let mut engine = scaled_engine();
        engine.begin_drag(100.0, 100.0);
        assert!(engine.is_dragging());
        assert!(engine.update_drag(110.0, 96.0));

        let placement = engine.placement();
        assert!((placement.offset_x - 50.0).abs() < 1e-9);
        assert!((placement.offset_y + 20.0).abs() < 1e-9);
        assert!(engine.take_render_request());
        assert!(!engine.take_render_request());
    }

    #[test]
    fn test_second_drag_starts_from_current_offset() {
        let mut engine = PlacementEngine::new(CanvasSize::new(100, 100).unwrap());
        engine.begin_drag(0.0, 0.0);
        engine.update_drag(10.0, 0.0);
        engine.end_drag();
        assert!(!engine.is_dragging());

        engine.begin_drag(500.0, 500.0);
        engine.update_drag(505.0, 503.0);
        assert_eq!(engine.placement().offset_x, 15.0);
        assert_eq!(engine.placement().offset_y, 3.0);
    }

    #[test]
    fn test_end_drag_is_idempotent() {
        let mut engine = scaled_engine();
        engine.end_drag();
        engine.begin_drag(1.0, 1.0);
        engine.end_drag();
        engine.end_drag();
        assert!(!engine.is_dragging());
        assert!(!engine.update_drag(9.0, 9.0));
    }

    #[test]
    fn test_non_finite_drag_start_is_ignored() {
        let mut engine = scaled_engine();
        engine.begin_drag(f64::NAN, 3.0);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_invalid_scale_leaves_state() {
        let mut engine = scaled_engine();
        engine.set_scale(2.0).unwrap();
        engine.take_render_request();

        assert!(engine.set_scale(0.0).is_err());
        assert!(engine.set_scale(-1.0).is_err());
        assert!(engine.set_scale(f64::NAN).is_err());
        assert!(engine.set_scale(1e300).is_err());
        assert_eq!(engine.placement().scale(), 2.0);
        assert!(!engine.take_render_request());
    }

    #[test]
    fn test_reset_is_atomic() {
        let mut engine = scaled_engine();
        engine.begin_drag(0.0, 0.0);
        engine.update_drag(4.0, 4.0);
        engine.end_drag();
        engine.set_scale(1.75).unwrap();
        engine.rotate();
        assert_eq!(engine.placement().zoom_percent(), 175);

        engine.reset_placement();
        assert!(engine.placement().is_identity());
        assert_eq!(engine.placement().zoom_percent(), 100);
        assert_eq!(engine.placement().rotation, Rotation::Deg0);
        assert!(engine.take_render_request());
    }

    #[test]
    fn test_set_display_size_updates_ratio() {
        let mut engine = PlacementEngine::new(CanvasSize::PRINT);
        assert_eq!(engine.display(), CanvasSize::PRINT.as_display());
        engine.set_display_size(DisplaySize::new(759.0, 600.0).unwrap());
        assert_eq!(engine.display().width, 759.0);
        assert_eq!(engine.display().height, 600.0);
        assert!((engine.ratio().x - 5.0).abs() < 1e-9);
        assert!((engine.ratio().y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_resize_mid_drag_uses_new_ratio() {
        let mut engine = PlacementEngine::new(CanvasSize::new(400, 200).unwrap());
        engine.begin_drag(0.0, 0.0);
        engine.set_display_size(DisplaySize::new(100.0, 100.0).unwrap());
        engine.update_drag(10.0, 10.0);
        assert_eq!(engine.placement().offset_x, 40.0);
        assert_eq!(engine.placement().offset_y, 20.0);
    }
}
