//! Translates editor input events into placement engine operations.

use posterframe_common::config::EditorConfig;
use posterframe_common::error::{PosterError, PosterResult};
use posterframe_placement_model::event::EditorEvent;
use posterframe_placement_model::geometry::DisplaySize;

use crate::engine::PlacementEngine;

/// Bounds of the zoom control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    /// Clamp a finite control value into the range.
    pub fn clamp(&self, value: f64) -> PosterResult<f64> {
        if !value.is_finite() {
            return Err(PosterError::invalid_input(format!(
                "zoom value must be finite, got {value}"
            )));
        }
        Ok(value.clamp(self.min, self.max))
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for ZoomRange {
    fn from(config: &EditorConfig) -> Self {
        Self {
            min: config.min_zoom,
            max: config.max_zoom,
        }
    }
}

/// Apply one input event to the engine.
///
/// Mouse and touch arrive as the same pointer events. Zoom values are
/// clamped into `zoom` the way a range control clamps its value.
pub fn apply_event(
    engine: &mut PlacementEngine,
    event: &EditorEvent,
    zoom: ZoomRange,
) -> PosterResult<()> {
    match *event {
        EditorEvent::PointerDown { x, y } => engine.begin_drag(x, y),
        EditorEvent::PointerMove { x, y } => {
            engine.update_drag(x, y);
        }
        EditorEvent::PointerUp => engine.end_drag(),
        EditorEvent::Zoom { value } => engine.set_scale(zoom.clamp(value)?)?,
        EditorEvent::Rotate => engine.rotate(),
        EditorEvent::Reset => engine.reset_placement(),
        EditorEvent::Resize { width, height } => {
            engine.set_display_size(DisplaySize::new(width, height)?)
        }
    }
    Ok(())
}

/// Apply a sequence of events, stopping at the first rejected one.
///
/// Returns the number of events applied.
pub fn apply_events<'a>(
    engine: &mut PlacementEngine,
    events: impl IntoIterator<Item = &'a EditorEvent>,
    zoom: ZoomRange,
) -> PosterResult<usize> {
    let mut applied = 0;
    for event in events {
        apply_event(engine, event, zoom).map_err(|e| {
            tracing::warn!(index = applied, ?event, error = %e, "Rejected editor event");
            e
        })?;
        applied += 1;
    }
    Ok(applied)
}
