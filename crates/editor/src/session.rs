//! Editor session: one user's pass from upload to download.
//!
//! The session owns every piece of mutable editor state (source image,
//! name, placement engine, preview surface, cached frame, export) and walks
//! the screen flow:
//!
//! ```text
//! Upload ─► Name ─► Editor ─► Processing ─► Preview ─► Thanks
//!                     ▲            │
//!                     │            ▼
//!                     └──── ExportFailed (retry)
//! ```
//!
//! `start_over` returns to `Upload` from any stage.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use posterframe_common::clock::{RenderThrottle, SessionClock};
use posterframe_common::config::AppConfig;
use posterframe_common::error::{PosterError, PosterResult};
use posterframe_placement_model::event::EditorEvent;
use posterframe_placement_model::geometry::CanvasSize;
use posterframe_placement_model::name::{download_file_name, UserName};
use posterframe_placement_model::placement::PlacementState;
use posterframe_render_engine::compositor;
use posterframe_render_engine::{
    decode_source, export_blocking, load_frame_and_export, ExportArtifact, FrameLoader,
    FrameOverlay, FrameSource, JpegQuality, SourceImage, Surface,
};

use crate::adapter::{apply_event, ZoomRange};
use crate::engine::PlacementEngine;
use crate::loads::{LoadSlot, LoadTicket};
use crate::submission::NameSubmitter;

/// Screen the user is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Waiting for an image.
    Upload,
    /// Image loaded, waiting for the user's name.
    Name,
    /// Live placement editing.
    Editor,
    /// Final composite being produced.
    Processing,
    /// Final composite ready to download.
    Preview,
    /// Downloaded.
    Thanks,
    /// The final composite could not be produced.
    ExportFailed { reason: String },
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Upload => "upload",
            Stage::Name => "name",
            Stage::Editor => "editor",
            Stage::Processing => "processing",
            Stage::Preview => "preview",
            Stage::Thanks => "thanks",
            Stage::ExportFailed { .. } => "export-failed",
        }
    }
}

/// A raster file handed to the session.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Whether the declared content type is `image/*`.
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// The finished poster, ready to save.
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Write the poster into `dir` under its download name.
    pub fn write_to_dir(&self, dir: &Path) -> PosterResult<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

enum ExportFrame {
    Cached(Arc<FrameOverlay>),
    Load {
        loader: FrameLoader,
        source: FrameSource,
    },
}

/// Everything needed to produce the final composite, detached from the
/// session so the session stays usable while it runs.
pub struct ExportJob {
    ticket: LoadTicket,
    image: Option<Arc<SourceImage>>,
    placement: PlacementState,
    canvas: CanvasSize,
    quality: JpegQuality,
    frame: ExportFrame,
}

impl ExportJob {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Load the frame if needed, then render and encode off the async thread.
    pub async fn run(self) -> PosterResult<ExportArtifact> {
        match self.frame {
            ExportFrame::Cached(frame) => {
                export_blocking(self.image, self.placement, frame, self.canvas, self.quality)
                    .await
            }
            ExportFrame::Load { loader, source } => {
                load_frame_and_export(
                    &loader,
                    &source,
                    self.image,
                    self.placement,
                    self.canvas,
                    self.quality,
                )
                .await
            }
        }
    }
}

/// State and flow of one poster editing session.
pub struct EditorSession {
    config: AppConfig,
    canvas: CanvasSize,
    stage: Stage,
    clock: SessionClock,
    source: LoadSlot<Arc<SourceImage>>,
    name: Option<UserName>,
    engine: PlacementEngine,
    zoom: ZoomRange,
    throttle: RenderThrottle,
    preview: Surface,
    frame_source: FrameSource,
    frame_loader: FrameLoader,
    frame: LoadSlot<Arc<FrameOverlay>>,
    export: LoadSlot<ExportArtifact>,
    quality: JpegQuality,
    submitter: NameSubmitter,
}

impl EditorSession {
    /// Create a session in the `Upload` stage.
    pub fn new(config: AppConfig) -> PosterResult<Self> {
        config.validate()?;
        let canvas = CanvasSize::new(config.canvas.width, config.canvas.height)?;
        let quality = JpegQuality::from_fraction(config.export.jpeg_quality)?;
        let frame_loader = FrameLoader::new(Duration::from_millis(config.frame.timeout_ms))?;
        let submitter = NameSubmitter::new(&config.submission)?;

        tracing::info!(
            canvas = %canvas,
            frame = %config.frame.location,
            submission = submitter.is_enabled(),
            "Editor session created"
        );

        Ok(Self {
            canvas,
            stage: Stage::Upload,
            clock: SessionClock::start(),
            source: LoadSlot::new("source image"),
            name: None,
            engine: PlacementEngine::new(canvas),
            zoom: ZoomRange::from(&config.editor),
            throttle: RenderThrottle::new(config.editor.refresh_hz),
            preview: Surface::new(canvas)?,
            frame_source: FrameSource::from(&config.frame),
            frame_loader,
            frame: LoadSlot::new("frame overlay"),
            export: LoadSlot::new("export"),
            quality,
            submitter,
            config,
        })
    }

    /// Replace the frame overlay location. Drops any cached overlay.
    pub fn set_frame_source(&mut self, source: FrameSource) {
        self.frame_source = source;
        self.frame.clear();
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn name(&self) -> Option<&UserName> {
        self.name.as_ref()
    }

    pub fn source_image(&self) -> Option<&SourceImage> {
        self.source.value().map(Arc::as_ref)
    }

    pub fn placement(&self) -> &PlacementState {
        self.engine.placement()
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    /// The live preview surface.
    pub fn preview(&self) -> &Surface {
        &self.preview
    }

    /// The final composite, once produced.
    pub fn export_artifact(&self) -> Option<&ExportArtifact> {
        self.export.value()
    }

    pub fn is_frame_loaded(&self) -> bool {
        self.frame.is_loaded()
    }

    fn require(&self, allowed: bool, action: &str) -> PosterResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(PosterError::session(format!(
                "cannot {action} during the {} stage",
                self.stage.label()
            )))
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!(from = self.stage.label(), to = stage.label(), "Stage changed");
        self.stage = stage;
    }

    // ── Upload ──────────────────────────────────────────────────────────

    /// Validate an upload and issue its load ticket.
    pub fn begin_upload(&mut self, upload: &ImageUpload) -> PosterResult<LoadTicket> {
        self.require(
            matches!(self.stage, Stage::Upload | Stage::Name),
            "upload an image",
        )?;
        if !upload.is_image() {
            return Err(PosterError::invalid_input("Please upload an image."));
        }
        let ticket = self.source.begin();
        tracing::info!(
            file = %upload.file_name,
            content_type = %upload.content_type,
            bytes = upload.bytes.len(),
            ticket = ticket.id(),
            "Image upload started"
        );
        Ok(ticket)
    }

    /// Decode upload bytes off the async thread.
    pub async fn decode_upload(upload: &ImageUpload) -> PosterResult<SourceImage> {
        decode_source(upload.bytes.clone()).await
    }

    /// Store a decoded upload.
    ///
    /// Returns `Ok(false)` if a newer upload (or a start-over) superseded
    /// this one; its result is discarded, errors included.
    pub fn finish_upload(
        &mut self,
        ticket: LoadTicket,
        result: PosterResult<SourceImage>,
    ) -> PosterResult<bool> {
        if !self.source.is_current(ticket) {
            tracing::debug!(ticket = ticket.id(), "Ignoring superseded upload");
            return Ok(false);
        }
        let image = result.map_err(|e| {
            tracing::warn!(error = %e, "Image upload failed");
            e
        })?;

        tracing::info!(
            width = image.width(),
            height = image.height(),
            "Source image loaded"
        );
        self.source.complete(ticket, Arc::new(image));
        self.engine.clear();
        self.export.clear();
        self.enter(Stage::Name);
        Ok(true)
    }

    /// Validate, decode and store an upload.
    pub async fn upload(&mut self, upload: ImageUpload) -> PosterResult<()> {
        let ticket = self.begin_upload(&upload)?;
        let result = Self::decode_upload(&upload).await;
        self.finish_upload(ticket, result).map(|_| ())
    }

    // ── Name ────────────────────────────────────────────────────────────

    /// Record the user's name and open the editor.
    ///
    /// The name is submitted in the background; the flow continues after
    /// the configured delay whatever the network does. The frame overlay
    /// must load before the editor opens; if it fails the stage stays at
    /// `Name` and the call can be retried.
    pub async fn submit_name(&mut self, raw: &str) -> PosterResult<()> {
        self.require(matches!(self.stage, Stage::Name), "submit a name")?;
        let name = UserName::parse(raw)?;

        if self.submitter.is_enabled() {
            // Detached. The submitter logs the outcome.
            drop(self.submitter.submit_detached(name.clone()));
        }
        self.name = Some(name);

        tokio::time::sleep(Duration::from_millis(self.config.submission.advance_delay_ms)).await;

        self.ensure_frame().await?;
        self.enter(Stage::Editor);
        self.throttle.request();
        Ok(())
    }

    /// Load the frame overlay unless it is already cached.
    pub async fn ensure_frame(&mut self) -> PosterResult<Arc<FrameOverlay>> {
        if let Some(frame) = self.frame.value() {
            return Ok(frame.clone());
        }
        let ticket = self.frame.begin();
        let frame = self
            .frame_loader
            .load(&self.frame_source, self.canvas)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Frame overlay unavailable");
                e
            })?;
        let frame = Arc::new(frame);
        self.frame.complete(ticket, frame.clone());
        Ok(frame)
    }

    // ── Editor ──────────────────────────────────────────────────────────

    fn edit<R>(
        &mut self,
        op: impl FnOnce(&mut PlacementEngine) -> PosterResult<R>,
    ) -> PosterResult<R> {
        self.require(matches!(self.stage, Stage::Editor), "edit the placement")?;
        let result = op(&mut self.engine)?;
        if self.engine.take_render_request() {
            self.throttle.request();
        }
        Ok(result)
    }

    /// Feed one input event through the adapter.
    pub fn handle_event(&mut self, event: &EditorEvent) -> PosterResult<()> {
        let zoom = self.zoom;
        self.edit(|engine| apply_event(engine, event, zoom))
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) -> PosterResult<()> {
        self.edit(|engine| {
            engine.begin_drag(x, y);
            Ok(())
        })
    }

    pub fn update_drag(&mut self, x: f64, y: f64) -> PosterResult<bool> {
        self.edit(|engine| Ok(engine.update_drag(x, y)))
    }

    pub fn end_drag(&mut self) -> PosterResult<()> {
        self.edit(|engine| {
            engine.end_drag();
            Ok(())
        })
    }

    pub fn set_scale(&mut self, value: f64) -> PosterResult<()> {
        self.edit(|engine| engine.set_scale(value))
    }

    pub fn rotate(&mut self) -> PosterResult<()> {
        self.edit(|engine| {
            engine.rotate();
            Ok(())
        })
    }

    pub fn reset_placement(&mut self) -> PosterResult<()> {
        self.edit(|engine| {
            engine.reset_placement();
            Ok(())
        })
    }

    /// Render the preview if one is due. Returns whether it rendered.
    pub fn pump(&mut self) -> PosterResult<bool> {
        let now = self.clock.elapsed_ns();
        self.pump_at(now)
    }

    /// [`pump`](Self::pump) with an explicit session time.
    pub fn pump_at(&mut self, now_ns: u64) -> PosterResult<bool> {
        if !self.throttle.poll(now_ns) {
            return Ok(false);
        }
        self.render_preview()?;
        Ok(true)
    }

    /// Render the preview now.
    pub fn render_preview(&mut self) -> PosterResult<()> {
        let frame = self
            .frame
            .value()
            .cloned()
            .ok_or_else(|| PosterError::session("frame overlay is not loaded"))?;
        let image = self.source.value().map(Arc::as_ref);
        compositor::render(&mut self.preview, image, self.engine.placement(), &frame);
        Ok(())
    }

    /// Render requests merged into an already pending render so far.
    pub fn coalesced_renders(&self) -> u64 {
        self.throttle.coalesced()
    }

    // ── Export ──────────────────────────────────────────────────────────

    /// Enter `Processing` and capture what the export needs.
    ///
    /// Starting another export while one is pending supersedes it; only the
    /// newest job's result is kept.
    pub fn begin_export(&mut self) -> PosterResult<ExportJob> {
        self.require(
            matches!(
                self.stage,
                Stage::Editor | Stage::Processing | Stage::ExportFailed { .. }
            ),
            "generate the poster",
        )?;
        self.engine.end_drag();
        let ticket = self.export.begin();
        let frame = match self.frame.value() {
            Some(frame) => ExportFrame::Cached(frame.clone()),
            None => ExportFrame::Load {
                loader: self.frame_loader.clone(),
                source: self.frame_source.clone(),
            },
        };
        let job = ExportJob {
            ticket,
            image: self.source.value().cloned(),
            placement: *self.engine.placement(),
            canvas: self.canvas,
            quality: self.quality,
            frame,
        };
        self.enter(Stage::Processing);
        Ok(job)
    }

    /// Store the result of an export job.
    ///
    /// Returns `Ok(false)` if the job was superseded. A failure moves the
    /// session to `ExportFailed` and is returned.
    pub fn finish_export(
        &mut self,
        ticket: LoadTicket,
        result: PosterResult<ExportArtifact>,
    ) -> PosterResult<bool> {
        if !self.export.is_current(ticket) {
            tracing::debug!(ticket = ticket.id(), "Ignoring superseded export");
            return Ok(false);
        }
        match result {
            Ok(artifact) => {
                self.export.complete(ticket, artifact);
                self.enter(Stage::Preview);
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, retryable = e.is_retryable(), "Export failed");
                self.enter(Stage::ExportFailed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Produce the final composite.
    pub async fn generate(&mut self) -> PosterResult<()> {
        let job = self.begin_export()?;
        let ticket = job.ticket();
        let result = job.run().await;
        self.finish_export(ticket, result).map(|_| ())
    }

    /// Try the export again after a failure.
    pub async fn retry_export(&mut self) -> PosterResult<()> {
        self.require(
            matches!(self.stage, Stage::ExportFailed { .. }),
            "retry the export",
        )?;
        self.generate().await
    }

    /// Hand out the poster and move to `Thanks`.
    pub fn download(&mut self) -> PosterResult<Download> {
        self.require(
            matches!(self.stage, Stage::Preview | Stage::Thanks),
            "download",
        )?;
        let artifact = self
            .export
            .value()
            .ok_or_else(|| PosterError::session("no poster has been generated"))?;
        let download = Download {
            file_name: download_file_name(self.name.as_ref(), &self.config.export),
            bytes: artifact.jpeg.clone(),
        };
        tracing::info!(
            file = %download.file_name,
            bytes = download.bytes.len(),
            "Poster downloaded"
        );
        self.enter(Stage::Thanks);
        Ok(download)
    }

    /// Forget the image, name, placement and export, and go back to
    /// `Upload`. In-flight uploads and exports become stale.
    pub fn start_over(&mut self) {
        self.source.clear();
        self.name = None;
        self.engine.clear();
        self.export.clear();
        self.throttle.cancel();
        self.preview.clear();
        self.enter(Stage::Upload);
    }
}
