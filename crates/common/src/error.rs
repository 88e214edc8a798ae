//! Error types shared across posterframe crates.

use std::path::PathBuf;

/// Top-level error type for posterframe operations.
#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    /// Rejected user input (non-image upload, empty name, bad scale).
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// An image resource could not be read, fetched, or decoded.
    #[error("Failed to load {resource}: {message}")]
    ResourceLoad { resource: String, message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    /// The operation is not valid in the session's current stage.
    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PosterError.
pub type PosterResult<T> = Result<T, PosterError>;

impl PosterError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn resource_load(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ResourceLoad {
            resource: resource.into(),
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether repeating the same operation may succeed.
    ///
    /// Resource loads and I/O can fail transiently; invalid input cannot.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ResourceLoad { .. } | Self::FileNotFound { .. } | Self::Io(_)
        )
    }

    /// Whether this error was caused by what the user supplied.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
