//! Decoded bitmaps: the user's source image and the frame overlay.
//!
//! Both are stored as premultiplied RGBA pixmaps ready for compositing.

use image::RgbaImage;
use tiny_skia::{ColorU8, Pixmap};

use posterframe_common::error::{PosterError, PosterResult};
use posterframe_placement_model::geometry::CanvasSize;

/// Convert straight-alpha RGBA into a premultiplied pixmap.
pub(crate) fn pixmap_from_rgba(image: &RgbaImage) -> PosterResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| PosterError::render(format!("cannot allocate {width}x{height} bitmap")))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn decode_rgba(bytes: &[u8], resource: &str) -> PosterResult<RgbaImage> {
    let format = image::guess_format(bytes)
        .map_err(|e| PosterError::resource_load(resource, format!("unrecognised image data: {e}")))?;
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PosterError::resource_load(resource, e.to_string()))?;
    tracing::debug!(
        resource,
        format = ?format,
        width = decoded.width(),
        height = decoded.height(),
        "Decoded image"
    );
    Ok(decoded.into_rgba8())
}

/// The user's uploaded image. Immutable once decoded.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixmap: Pixmap,
}

impl SourceImage {
    /// Decode an encoded raster (PNG, JPEG, WebP, ...).
    pub fn decode(bytes: &[u8]) -> PosterResult<Self> {
        let rgba = decode_rgba(bytes, "source image")?;
        Self::from_rgba(&rgba)
    }

    /// Wrap already-decoded pixels.
    pub fn from_rgba(image: &RgbaImage) -> PosterResult<Self> {
        Ok(Self {
            pixmap: pixmap_from_rgba(image)?,
        })
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// The decorative frame drawn over the full canvas.
#[derive(Debug, Clone)]
pub struct FrameOverlay {
    pixmap: Pixmap,
}

impl FrameOverlay {
    /// Decode an encoded overlay bitmap.
    pub fn decode(bytes: &[u8]) -> PosterResult<Self> {
        let rgba = decode_rgba(bytes, "frame overlay")?;
        Self::from_rgba(&rgba)
    }

    /// Wrap already-decoded pixels.
    pub fn from_rgba(image: &RgbaImage) -> PosterResult<Self> {
        Ok(Self {
            pixmap: pixmap_from_rgba(image)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Whether the overlay was authored at exactly the canvas size.
    pub fn matches(&self, canvas: CanvasSize) -> bool {
        self.width() == canvas.width && self.height() == canvas.height
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_source() {
        let img = RgbaImage::from_pixel(8, 5, Rgba([200, 10, 10, 255]));
        let source = SourceImage::decode(&encode_png(&img)).unwrap();
        assert_eq!((source.width(), source.height()), (8, 5));
        let px = source.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (200, 10, 10, 255));
    }

    #[test]
    fn test_premultiplies_translucent_pixels() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        let source = SourceImage::from_rgba(&img).unwrap();
        let px = source.pixmap().pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), 128);
    }

    #[test]
    fn test_garbage_is_resource_load_error() {
        let err = SourceImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PosterError::ResourceLoad { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_frame_matches_canvas() {
        let frame = FrameOverlay::from_rgba(&RgbaImage::new(40, 30)).unwrap();
        assert!(frame.matches(CanvasSize::new(40, 30).unwrap()));
        assert!(!frame.matches(CanvasSize::new(30, 40).unwrap()));
    }
}
