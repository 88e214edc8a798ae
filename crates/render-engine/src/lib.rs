//! posterframe Render Engine
//!
//! Composites the user's placed image beneath the decorative frame and
//! encodes the flattened result as a JPEG.
//!
//! # Pipeline Architecture
//!
//! ```text
//! upload bytes ── decode ── SourceImage ──┐
//!                                         ├── placement transform
//! PlacementState ─────────────────────────┘         │
//!                                                   ├── Frame overlay (always on top)
//! frame.png ── load ── FrameOverlay ────────────────┘         │
//!                                                             ▼
//!                                                   Surface (canvas size)
//!                                                             │
//!                                                  flatten + encode (JPEG)
//!                                                             │
//!                                                             ▼
//!                                              data:image/jpeg;base64,...
//! ```
//!
//! The same [`compositor::render`] routine draws both the live preview and
//! the off-screen export surface.

pub mod assets;
pub mod bitmap;
pub mod compositor;
pub mod export;
pub mod surface;

pub use assets::*;
pub use bitmap::*;
pub use export::*;
pub use surface::*;
