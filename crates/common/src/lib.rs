//! posterframe Common Utilities
//!
//! Shared infrastructure for all posterframe crates:
//! - Error types and result aliases
//! - Session clock and render throttling for the live preview
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
