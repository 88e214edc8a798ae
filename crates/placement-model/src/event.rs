//! Editor input events.
//!
//! Platform input (mouse, touch, slider, buttons) is reduced to this small
//! vocabulary before it reaches the placement engine. Events can be
//! recorded and replayed as JSONL, one object per line; lines starting
//! with `#` are comments.

use serde::{Deserialize, Serialize};

/// A single editor input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorEvent {
    /// Mouse button or first touch went down on the preview.
    PointerDown {
        /// X in display units.
        x: f64,
        /// Y in display units.
        y: f64,
    },

    /// Pointer moved (anywhere; ignored unless a drag is active).
    PointerMove { x: f64, y: f64 },

    /// Mouse button released or touch ended.
    PointerUp,

    /// Zoom slider moved.
    Zoom {
        /// New uniform scale.
        value: f64,
    },

    /// Rotate button pressed.
    Rotate,

    /// Reset button pressed.
    Reset,

    /// The preview's on-screen size changed.
    Resize {
        /// Displayed width in display units.
        width: f64,
        /// Displayed height in display units.
        height: f64,
    },
}

impl EditorEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn zoom(value: f64) -> Self {
        Self::Zoom { value }
    }

    pub fn resize(width: f64, height: f64) -> Self {
        Self::Resize { width, height }
    }
}

/// Parse events from JSONL content (one JSON object per line).
pub fn parse_events(jsonl: &str) -> Result<Vec<EditorEvent>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize events to JSONL format.
pub fn serialize_events(events: &[EditorEvent]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for event in events {
        output.push_str(&serde_json::to_string(event)?);
        output.push('\n');
    }
    Ok(output)
}
