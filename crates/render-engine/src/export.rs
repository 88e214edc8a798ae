//! Final composite export.

use std::sync::Arc;

use base64::Engine;
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use posterframe_common::error::{PosterError, PosterResult};
use posterframe_placement_model::geometry::CanvasSize;
use posterframe_placement_model::placement::PlacementState;

use crate::assets::{FrameLoader, FrameSource};
use crate::bitmap::{FrameOverlay, SourceImage};
use crate::compositor;
use crate::surface::Surface;

/// MIME type of every exported artifact.
pub const EXPORT_MIME: &str = "image/jpeg";

/// JPEG quality on the encoder's 1..=100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegQuality(u8);

impl JpegQuality {
    /// Convert a `(0.0, 1.0]` fraction, as used by canvas `toDataURL`.
    pub fn from_fraction(fraction: f32) -> PosterResult<Self> {
        if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
            return Err(PosterError::invalid_input(format!(
                "JPEG quality must be in (0, 1], got {fraction}"
            )));
        }
        Ok(Self((fraction * 100.0).round().clamp(1.0, 100.0) as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(95)
    }
}

/// A flattened, encoded poster.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Pixel size of the encoded image.
    pub size: CanvasSize,

    /// Encoded JPEG bytes.
    pub jpeg: Vec<u8>,

    /// Quality the JPEG was encoded at.
    pub quality: JpegQuality,

    /// When the composite was produced.
    pub generated_at: DateTime<Utc>,
}

impl ExportArtifact {
    /// Self-contained `data:` URL, suitable for an `<img src>` or a download link.
    pub fn data_url(&self) -> String {
        let mut url = format!("data:{EXPORT_MIME};base64,");
        base64::prelude::BASE64_STANDARD.encode_string(&self.jpeg, &mut url);
        url
    }

    /// Encoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.jpeg.len()
    }
}

/// Encode a surface as JPEG after compositing it onto black.
pub fn encode_jpeg(surface: &Surface, quality: JpegQuality) -> PosterResult<Vec<u8>> {
    let flat = surface.flatten();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.value())
        .write_image(
            flat.as_raw(),
            flat.width(),
            flat.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| PosterError::export(format!("JPEG encoding failed: {e}")))?;
    Ok(jpeg)
}

/// Render the composite on a fresh off-screen surface and encode it.
///
/// The surface is always `canvas` sized, whatever the source image's
/// dimensions. With no image the result is the frame overlay alone.
pub fn export_composite(
    image: Option<&SourceImage>,
    placement: &PlacementState,
    frame: &FrameOverlay,
    canvas: CanvasSize,
    quality: JpegQuality,
) -> PosterResult<ExportArtifact> {
    let mut surface = Surface::new(canvas)?;
    compositor::render(&mut surface, image, placement, frame);
    let jpeg = encode_jpeg(&surface, quality)?;

    tracing::info!(
        canvas = %canvas,
        quality = quality.value(),
        bytes = jpeg.len(),
        has_image = image.is_some(),
        "Exported composite"
    );

    Ok(ExportArtifact {
        size: canvas,
        jpeg,
        quality,
        generated_at: Utc::now(),
    })
}

/// Run [`export_composite`] on the blocking pool.
pub async fn export_blocking(
    image: Option<Arc<SourceImage>>,
    placement: PlacementState,
    frame: Arc<FrameOverlay>,
    canvas: CanvasSize,
    quality: JpegQuality,
) -> PosterResult<ExportArtifact> {
    tokio::task::spawn_blocking(move || {
        export_composite(image.as_deref(), &placement, &frame, canvas, quality)
    })
    .await
    .map_err(|e| PosterError::Other(anyhow::anyhow!("export task failed: {e}")))?
}

/// Load the frame overlay, then export.
///
/// The frame load is the only suspension point; a load failure is returned
/// as-is and no partial composite is produced.
pub async fn load_frame_and_export(
    loader: &FrameLoader,
    frame_source: &FrameSource,
    image: Option<Arc<SourceImage>>,
    placement: PlacementState,
    canvas: CanvasSize,
    quality: JpegQuality,
) -> PosterResult<ExportArtifact> {
    let frame = Arc::new(loader.load(frame_source, canvas).await?);
    export_blocking(image, placement, frame, canvas, quality).await
}
