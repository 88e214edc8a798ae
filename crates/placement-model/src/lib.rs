//! posterframe Placement Model
//!
//! Defines the core data contracts for the poster editor:
//! - **Geometry:** fixed canvas size, on-screen display size, and the
//!   display-to-intrinsic ratio used to interpret pointer drags
//! - **Placement:** offset, uniform scale, and quarter-turn rotation of the
//!   user's image within the canvas
//! - **Drag:** anchor snapshot for drift-free pointer gestures
//! - **Events:** editor input events, recorded as JSONL
//! - **Name:** validated user name and download file naming
//!
//! Offsets are expressed in canvas pixels, in the image's rotated frame.

pub mod drag;
pub mod event;
pub mod geometry;
pub mod name;
pub mod placement;

pub use drag::*;
pub use event::*;
pub use geometry::*;
pub use name::*;
pub use placement::*;
