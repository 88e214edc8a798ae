//! Canvas and display geometry.
//!
//! The canvas is stored at a fixed print resolution but shown scaled down
//! on screen. Pointer input arrives in display units and must be rescaled
//! into canvas pixels before it can move the image.

use serde::{Deserialize, Serialize};

use posterframe_common::config::CanvasConfig;
use posterframe_common::error::{PosterError, PosterResult};

/// Fixed pixel resolution of a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// 32.14 cm x 25.4 cm at 300 DPI, landscape.
    pub const PRINT: CanvasSize = CanvasSize {
        width: 3795,
        height: 3000,
    };

    /// Create a canvas size, rejecting empty dimensions.
    pub fn new(width: u32, height: u32) -> PosterResult<Self> {
        if width == 0 || height == 0 {
            return Err(PosterError::invalid_input(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Geometric center in canvas pixels.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// This canvas as a display size (a 1:1 on-screen presentation).
    pub fn as_display(&self) -> DisplaySize {
        DisplaySize {
            width: self.width as f64,
            height: self.height as f64,
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::PRINT
    }
}

impl From<CanvasConfig> for CanvasSize {
    fn from(config: CanvasConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }
}

impl std::fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// On-screen size of a canvas in display units (CSS pixels, points...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    /// Create a display size. Both sides must be finite and positive.
    pub fn new(width: f64, height: f64) -> PosterResult<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(PosterError::invalid_input(format!(
                "display size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

/// Per-axis factor converting display units into canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRatio {
    pub x: f64,
    pub y: f64,
}

impl ScaleRatio {
    /// No rescaling.
    pub const IDENTITY: ScaleRatio = ScaleRatio { x: 1.0, y: 1.0 };

    /// Ratio of the canvas's intrinsic size to its displayed size.
    pub fn display_to_intrinsic(canvas: CanvasSize, display: DisplaySize) -> Self {
        Self {
            x: canvas.width as f64 / display.width,
            y: canvas.height as f64 / display.height,
        }
    }

    /// Rescale a display-space displacement into canvas pixels.
    pub fn apply(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx * self.x, dy * self.y)
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to this point.
    pub fn delta_from(&self, origin: &Point2D) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}
