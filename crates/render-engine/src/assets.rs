//! Image resource loading.
//!
//! Decoding runs on the blocking pool so the editor's event loop stays
//! responsive. Every failure (missing file, HTTP error, undecodable bytes)
//! surfaces as [`PosterError::ResourceLoad`] rather than hanging.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};

use posterframe_common::config::FrameConfig;
use posterframe_common::error::{PosterError, PosterResult};
use posterframe_placement_model::geometry::CanvasSize;

use crate::bitmap::{FrameOverlay, SourceImage};

static POSTERFRAME_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const FRAME_RESOURCE: &str = "frame overlay";

/// Where the frame overlay bitmap lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSource {
    /// Local file.
    File(PathBuf),
    /// `http://` or `https://` URL.
    Remote(String),
    /// Bytes already in memory (embedded asset, tests).
    Inline(Arc<[u8]>),
}

impl FrameSource {
    /// Interpret a configured location as a URL or a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            FrameSource::Remote(location.to_string())
        } else {
            FrameSource::File(PathBuf::from(location))
        }
    }

    pub fn inline(bytes: impl Into<Arc<[u8]>>) -> Self {
        FrameSource::Inline(bytes.into())
    }

    /// Human-readable description for logs and errors.
    pub fn describe(&self) -> String {
        match self {
            FrameSource::File(path) => path.display().to_string(),
            FrameSource::Remote(url) => url.clone(),
            FrameSource::Inline(bytes) => format!("<inline {} bytes>", bytes.len()),
        }
    }
}

impl From<&FrameConfig> for FrameSource {
    fn from(config: &FrameConfig) -> Self {
        FrameSource::parse(&config.location)
    }
}

/// Fetches and decodes frame overlays.
#[derive(Debug, Clone)]
pub struct FrameLoader {
    client: Client,
}

impl FrameLoader {
    /// Create a loader whose remote fetches give up after `timeout`.
    pub fn new(timeout: Duration) -> PosterResult<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(POSTERFRAME_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| PosterError::config(format!("Failed to construct HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Load and decode the overlay.
    ///
    /// A size mismatch with `canvas` is logged; the overlay is still usable
    /// because the compositor stretches it over the full surface.
    pub async fn load(&self, source: &FrameSource, canvas: CanvasSize) -> PosterResult<FrameOverlay> {
        tracing::info!(source = %source.describe(), "Loading frame overlay");
        let bytes = self.fetch(source).await?;
        let frame = decode_blocking(bytes, FrameOverlay::decode).await?;

        if !frame.matches(canvas) {
            tracing::warn!(
                frame_width = frame.width(),
                frame_height = frame.height(),
                canvas = %canvas,
                "Frame overlay size differs from canvas; it will be stretched"
            );
        }
        Ok(frame)
    }

    async fn fetch(&self, source: &FrameSource) -> PosterResult<Arc<[u8]>> {
        match source {
            FrameSource::Inline(bytes) => Ok(bytes.clone()),
            FrameSource::File(path) => tokio::fs::read(path)
                .await
                .map(Arc::from)
                .map_err(|e| {
                    PosterError::resource_load(FRAME_RESOURCE, format!("{}: {e}", path.display()))
                }),
            FrameSource::Remote(url) => {
                let response = self.client.get(url).send().await.map_err(|e| {
                    PosterError::resource_load(FRAME_RESOURCE, format!("{url}: {e}"))
                })?;
                match response.status() {
                    StatusCode::OK => response.bytes().await.map(|b| Arc::from(b.as_ref())).map_err(
                        |e| PosterError::resource_load(FRAME_RESOURCE, format!("{url}: {e}")),
                    ),
                    status => {
                        tracing::error!(url = %url, status = ?status, "Frame overlay request failed");
                        Err(PosterError::resource_load(
                            FRAME_RESOURCE,
                            format!("{url}: HTTP {status}"),
                        ))
                    }
                }
            }
        }
    }
}

/// Decode an uploaded image on the blocking pool.
pub async fn decode_source(bytes: Arc<[u8]>) -> PosterResult<SourceImage> {
    decode_blocking(bytes, SourceImage::decode).await
}

async fn decode_blocking<T, F>(bytes: Arc<[u8]>, decode: F) -> PosterResult<T>
where
    T: Send + 'static,
    F: FnOnce(&[u8]) -> PosterResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || decode(&bytes[..]))
        .await
        .map_err(|e| PosterError::Other(anyhow::anyhow!("decode task failed: {e}")))?
}
