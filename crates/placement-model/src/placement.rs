//! Image placement within the canvas.

use serde::{Deserialize, Serialize};

use posterframe_common::error::{PosterError, PosterResult};

/// Quarter-turn rotation applied clockwise about the canvas center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotation in degrees, one of 0, 90, 180, 270.
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotation in radians.
    pub fn radians(self) -> f64 {
        (self.degrees() as f64).to_radians()
    }

    /// `(cos, sin)` of the angle, exact for every quarter turn.
    pub fn cos_sin(self) -> (f64, f64) {
        match self {
            Rotation::Deg0 => (1.0, 0.0),
            Rotation::Deg90 => (0.0, 1.0),
            Rotation::Deg180 => (-1.0, 0.0),
            Rotation::Deg270 => (0.0, -1.0),
        }
    }

    /// Advance by +90 degrees, wrapping 270 back to 0.
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Parse degrees. Multiples of 90 are normalised into `[0, 360)`.
    pub fn from_degrees(degrees: i32) -> PosterResult<Self> {
        if degrees % 90 != 0 {
            return Err(PosterError::invalid_input(format!(
                "rotation must be a multiple of 90 degrees, got {degrees}"
            )));
        }
        Ok(match degrees.rem_euclid(360) {
            0 => Rotation::Deg0,
            90 => Rotation::Deg90,
            180 => Rotation::Deg180,
            _ => Rotation::Deg270,
        })
    }
}

impl TryFrom<u16> for Rotation {
    type Error = PosterError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees as i32)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Offset, uniform scale, and rotation of the user's image.
///
/// The offset is in canvas pixels, measured in the image's rotated frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementState {
    pub offset_x: f64,
    pub offset_y: f64,
    scale: f64,
    pub rotation: Rotation,
}

impl PlacementState {
    /// Centered, unscaled, unrotated.
    pub const IDENTITY: PlacementState = PlacementState {
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
        rotation: Rotation::Deg0,
    };

    /// Largest accepted scale. Any decodable image stays within `f32`
    /// range when drawn at this scale.
    pub const MAX_SCALE: f64 = 1.0e6;

    /// Build a placement, validating the scale.
    pub fn new(offset_x: f64, offset_y: f64, scale: f64, rotation: Rotation) -> PosterResult<Self> {
        let mut placement = Self {
            offset_x,
            offset_y,
            rotation,
            ..Self::IDENTITY
        };
        placement.set_scale(scale)?;
        Ok(placement)
    }

    /// Uniform scale, always finite and positive.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the scale. Non-positive, non-finite, or values above
    /// [`MAX_SCALE`](Self::MAX_SCALE) are rejected.
    pub fn set_scale(&mut self, scale: f64) -> PosterResult<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(PosterError::invalid_input(format!(
                "scale must be positive, got {scale}"
            )));
        }
        if scale > Self::MAX_SCALE {
            return Err(PosterError::invalid_input(format!(
                "scale must be at most {}, got {scale}",
                Self::MAX_SCALE
            )));
        }
        self.scale = scale;
        Ok(())
    }

    /// Zoom read-out shown next to the slider, in whole percent.
    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0).round() as u32
    }

    /// Advance rotation by a quarter turn.
    pub fn rotate(&mut self) {
        self.rotation = self.rotation.next();
    }

    /// Restore the identity placement.
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Whether this is the identity placement.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Displayed size of an image with the given intrinsic size.
    pub fn displayed_size(&self, intrinsic_width: u32, intrinsic_height: u32) -> (f64, f64) {
        (
            intrinsic_width as f64 * self.scale,
            intrinsic_height as f64 * self.scale,
        )
    }
}

impl Default for PlacementState {
    fn default() -> Self {
        Self::IDENTITY
    }
}
