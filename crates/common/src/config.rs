//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PosterError, PosterResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fixed output canvas.
    pub canvas: CanvasConfig,

    /// Decorative frame overlay.
    pub frame: FrameConfig,

    /// JPEG export and download naming.
    pub export: ExportSettings,

    /// Best-effort name submission.
    pub submission: SubmissionConfig,

    /// Live editor behaviour.
    pub editor: EditorConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Canvas resolution in pixels.
///
/// The default is 32.14 cm x 25.4 cm at 300 DPI, landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

/// Where the frame overlay comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Local path or `http(s)://` URL of the overlay bitmap.
    pub location: String,

    /// Remote fetch timeout in milliseconds.
    pub timeout_ms: u64,
}

/// Export encoding and download naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// JPEG quality in `(0.0, 1.0]`.
    pub jpeg_quality: f32,

    /// Prepended to the sanitized user name.
    pub file_prefix: String,

    /// Appended after the sanitized user name.
    pub file_extension: String,

    /// Used when the sanitized name is empty.
    pub fallback_name: String,
}

/// Form endpoint that collects submitted names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Endpoint URL; `None` disables submission.
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Delay before the flow advances, whatever the network outcome.
    pub advance_delay_ms: u64,
}

/// Live editor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Preview redraws are coalesced to this rate.
    pub refresh_hz: u32,

    /// Lower bound of the zoom control.
    pub min_zoom: f64,

    /// Upper bound of the zoom control.
    pub max_zoom: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "posterframe=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 3795,
            height: 3000,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            location: "frame.png".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            jpeg_quality: 0.95,
            file_prefix: "UPSA_MedicalOutreach_".to_string(),
            file_extension: ".jpg".to_string(),
            fallback_name: "Poster".to_string(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: Some("https://formspree.io/f/myznjrpk".to_string()),
            timeout_ms: 5_000,
            advance_delay_ms: 700,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            refresh_hz: 60,
            min_zoom: 0.1,
            max_zoom: 5.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> PosterResult<Self> {
        if !path.exists() {
            return Err(PosterError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> PosterResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: &Path) -> PosterResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the engine cannot honour.
    pub fn validate(&self) -> PosterResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PosterError::config("canvas dimensions must be non-zero"));
        }
        if !(self.export.jpeg_quality > 0.0 && self.export.jpeg_quality <= 1.0) {
            return Err(PosterError::config(format!(
                "jpeg_quality must be in (0, 1], got {}",
                self.export.jpeg_quality
            )));
        }
        if self.editor.refresh_hz == 0 {
            return Err(PosterError::config("refresh_hz must be positive"));
        }
        if !(self.editor.min_zoom > 0.0 && self.editor.min_zoom <= self.editor.max_zoom) {
            return Err(PosterError::config(format!(
                "zoom range [{}, {}] is invalid",
                self.editor.min_zoom, self.editor.max_zoom
            )));
        }
        if self.frame.location.trim().is_empty() {
            return Err(PosterError::config("frame location is empty"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("posterframe").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_print_size() {
        let config = AppConfig::default();
        assert_eq!(config.canvas.width, 3795);
        assert_eq!(config.canvas.height, 3000);
        assert!((config.export.jpeg_quality - 0.95).abs() < f32::EPSILON);
        assert_eq!(config.export.file_prefix, "UPSA_MedicalOutreach_");
        assert_eq!(config.submission.advance_delay_ms, 700);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let raw = r#"{ "canvas": { "width": 400, "height": 300 }, "submission": { "endpoint": null } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.canvas.width, 400);
        assert!(config.submission.endpoint.is_none());
        assert_eq!(config.submission.timeout_ms, 5_000);
        assert_eq!(config.frame.location, "frame.png");
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let mut config = AppConfig::default();
        config.export.jpeg_quality = 0.0;
        assert!(matches!(config.validate(), Err(PosterError::Config { .. })));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.canvas.width = 640;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.canvas.width, 640);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PosterError::FileNotFound { .. }));
    }
}
