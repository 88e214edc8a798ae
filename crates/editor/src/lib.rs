//! posterframe Editor
//!
//! The interactive side of posterframe:
//! - [`PlacementEngine`]: placement state and drag gestures
//! - [`adapter`]: maps pointer, slider and button events onto the engine
//! - [`LoadSlot`]: last-load-wins handling for uploads, frames and exports
//! - [`NameSubmitter`]: best-effort name collection
//! - [`EditorSession`]: the upload → name → editor → preview → download flow

pub mod adapter;
pub mod engine;
pub mod loads;
pub mod session;
pub mod submission;

pub use adapter::{apply_event, apply_events, ZoomRange};
pub use engine::PlacementEngine;
pub use loads::{LoadSlot, LoadTicket};
pub use session::{Download, EditorSession, ExportJob, ImageUpload, Stage};
pub use submission::{NameSubmitter, SubmissionOutcome};
