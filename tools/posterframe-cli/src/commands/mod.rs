pub mod check;
pub mod compose;
pub mod config;
pub mod replay;

use std::path::{Path, PathBuf};

use posterframe_editor::{EditorSession, ImageUpload};

/// Read an image file as an upload, guessing its MIME type from the extension.
pub async fn read_upload(path: &Path) -> anyhow::Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let content_type = image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageUpload::new(file_name, content_type, bytes))
}

/// Generate the poster and save it into `output`.
pub async fn export_and_save(session: &mut EditorSession, output: &Path) -> anyhow::Result<PathBuf> {
    println!("  Generating {} poster...", session.canvas());
    session.generate().await?;
    let download = session.download()?;
    let path = download.write_to_dir(output)?;
    println!("Poster saved: {}", path.display());
    Ok(path)
}
