//! Fixed-size drawing surface.

use image::{Rgb, RgbImage, RgbaImage};
use tiny_skia::{Color, Pixmap};

use posterframe_common::error::{PosterError, PosterResult};
use posterframe_placement_model::geometry::CanvasSize;

/// A canvas-sized RGBA drawing target.
///
/// Its size is fixed at construction. The live preview and the export each
/// own one.
#[derive(Debug, Clone)]
pub struct Surface {
    size: CanvasSize,
    pixmap: Pixmap,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(size: CanvasSize) -> PosterResult<Self> {
        let pixmap = Pixmap::new(size.width, size.height)
            .ok_or_else(|| PosterError::render(format!("cannot allocate {size} surface")))?;
        Ok(Self { size, pixmap })
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Raw premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA of one pixel.
    ///
    /// `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Straight-alpha copy of the whole surface.
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.size.width, self.size.height, |x, y| {
            image::Rgba(self.pixel(x, y).unwrap_or([0, 0, 0, 0]))
        })
    }

    /// Opaque copy with transparency composited onto black.
    ///
    /// JPEG has no alpha channel; this matches what a browser canvas does
    /// when asked for `image/jpeg`.
    pub fn flatten(&self) -> RgbImage {
        let mut out = RgbImage::new(self.size.width, self.size.height);
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            // Premultiplied channels are already the colour over black.
            *dst = Rgb([src.red(), src.green(), src.blue()]);
        }
        out
    }
}
