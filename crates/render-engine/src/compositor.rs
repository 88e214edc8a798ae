//! Compositor: draws the placed image beneath the frame overlay.
//!
//! The transform is built the way a 2D canvas context would be driven:
//! translate to the surface center, rotate, then draw the image centered
//! and offset in the rotated frame. Offsets therefore follow the image as
//! it appears on screen, not the canvas axes.

use tiny_skia::{FilterQuality, PixmapPaint, Transform};

use posterframe_placement_model::geometry::{CanvasSize, Point2D};
use posterframe_placement_model::placement::PlacementState;

use crate::bitmap::{FrameOverlay, SourceImage};
use crate::surface::Surface;

/// Map a point in image pixel space into canvas pixel space.
pub fn image_to_canvas(
    canvas: CanvasSize,
    image_width: u32,
    image_height: u32,
    placement: &PlacementState,
    point: Point2D,
) -> Point2D {
    let center = canvas.center();
    let (cos, sin) = placement.rotation.cos_sin();
    let (w, h) = placement.displayed_size(image_width, image_height);

    let local_x = -w / 2.0 + placement.offset_x + point.x * placement.scale();
    let local_y = -h / 2.0 + placement.offset_y + point.y * placement.scale();

    Point2D::new(
        center.x + cos * local_x - sin * local_y,
        center.y + sin * local_x + cos * local_y,
    )
}

/// Axis-aligned canvas bounds `(min, max)` covered by the placed image.
pub fn placed_bounds(
    canvas: CanvasSize,
    image_width: u32,
    image_height: u32,
    placement: &PlacementState,
) -> (Point2D, Point2D) {
    let (iw, ih) = (image_width as f64, image_height as f64);
    let corners = [(0.0, 0.0), (iw, 0.0), (0.0, ih), (iw, ih)].map(|(x, y)| {
        image_to_canvas(
            canvas,
            image_width,
            image_height,
            placement,
            Point2D::new(x, y),
        )
    });

    let mut min = corners[0];
    let mut max = corners[0];
    for c in &corners[1..] {
        min.x = min.x.min(c.x);
        min.y = min.y.min(c.y);
        max.x = max.x.max(c.x);
        max.y = max.y.max(c.y);
    }
    (min, max)
}

/// Transform taking image pixels to canvas pixels.
pub fn placement_transform(
    canvas: CanvasSize,
    image_width: u32,
    image_height: u32,
    placement: &PlacementState,
) -> Transform {
    let center = canvas.center();
    let (cos, sin) = placement.rotation.cos_sin();
    let (w, h) = placement.displayed_size(image_width, image_height);

    let rotation = Transform::from_row(
        cos as f32,
        sin as f32,
        -sin as f32,
        cos as f32,
        0.0,
        0.0,
    );

    Transform::from_translate(center.x as f32, center.y as f32)
        .pre_concat(rotation)
        .pre_translate(
            (-w / 2.0 + placement.offset_x) as f32,
            (-h / 2.0 + placement.offset_y) as f32,
        )
        .pre_scale(
            (w / image_width as f64) as f32,
            (h / image_height as f64) as f32,
        )
}

/// Render one composite into `surface`.
///
/// Clears the surface, draws the placed image if there is one, and draws
/// the frame overlay stretched over the full surface last.
pub fn render(
    surface: &mut Surface,
    image: Option<&SourceImage>,
    placement: &PlacementState,
    frame: &FrameOverlay,
) {
    let canvas = surface.size();
    surface.clear();

    if let Some(image) = image {
        let transform = placement_transform(canvas, image.width(), image.height(), placement);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        surface
            .pixmap_mut()
            .draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);

        let (min, max) = placed_bounds(canvas, image.width(), image.height(), placement);
        tracing::trace!(
            min_x = min.x,
            min_y = min.y,
            max_x = max.x,
            max_y = max.y,
            rotation = placement.rotation.degrees(),
            scale = placement.scale(),
            "Placed source image"
        );
    }

    let frame_paint = if frame.matches(canvas) {
        PixmapPaint::default()
    } else {
        PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        }
    };
    let frame_transform = Transform::from_scale(
        canvas.width as f32 / frame.width() as f32,
        canvas.height as f32 / frame.height() as f32,
    );
    surface.pixmap_mut().draw_pixmap(
        0,
        0,
        frame.pixmap().as_ref(),
        &frame_paint,
        frame_transform,
        None,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use posterframe_placement_model::placement::Rotation;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn canvas() -> CanvasSize {
        CanvasSize::new(200, 100).unwrap()
    }

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> SourceImage {
        SourceImage::from_rgba(&RgbaImage::from_pixel(w, h, Rgba(rgba))).unwrap()
    }

    fn empty_frame(canvas: CanvasSize) -> FrameOverlay {
        FrameOverlay::from_rgba(&RgbaImage::new(canvas.width, canvas.height)).unwrap()
    }

    #[test]
    fn test_identity_centers_image() {
        let (min, max) = placed_bounds(canvas(), 40, 20, &PlacementState::IDENTITY);
        assert_eq!(min, Point2D::new(80.0, 40.0));
        assert_eq!(max, Point2D::new(120.0, 60.0));
    }

    #[test]
    fn test_offset_applies_in_rotated_frame() {
        let placement = PlacementState::new(10.0, 0.0, 1.0, Rotation::Deg90).unwrap();
        // A +x offset in the image frame moves the image down the canvas once rotated 90°.
        let (min, max) = placed_bounds(canvas(), 40, 20, &placement);
        assert_eq!(min, Point2D::new(90.0, 40.0));
        assert_eq!(max, Point2D::new(110.0, 80.0));
    }

    #[test]
    fn test_rotation_is_clockwise() {
        let placement = PlacementState::new(0.0, 0.0, 1.0, Rotation::Deg90).unwrap();
        // Image top-left corner lands at the top-right after a clockwise quarter turn.
        let p = image_to_canvas(canvas(), 40, 20, &placement, Point2D::ORIGIN);
        assert_eq!(p, Point2D::new(110.0, 30.0));
    }

    #[test]
    fn test_transform_agrees_with_point_mapping() {
        let placement = PlacementState::new(7.0, -3.0, 1.5, Rotation::Deg270).unwrap();
        let transform = placement_transform(canvas(), 40, 20, &placement);
        let mut points = [tiny_skia::Point::from_xy(40.0, 20.0)];
        transform.map_points(&mut points);

        let expected = image_to_canvas(canvas(), 40, 20, &placement, Point2D::new(40.0, 20.0));
        assert!((points[0].x as f64 - expected.x).abs() < 1e-3);
        assert!((points[0].y as f64 - expected.y).abs() < 1e-3);
    }

    #[test]
    fn test_render_draws_image_under_frame() {
        let canvas = canvas();
        let mut surface = Surface::new(canvas).unwrap();

        let mut frame_pixels = RgbaImage::new(canvas.width, canvas.height);
        for x in 0..canvas.width {
            frame_pixels.put_pixel(x, 0, Rgba([0, 0, 255, 255]));
        }
        let frame = FrameOverlay::from_rgba(&frame_pixels).unwrap();
        let image = solid(400, 400, RED);

        render(&mut surface, Some(&image), &PlacementState::IDENTITY, &frame);

        assert_eq!(surface.pixel(100, 50), Some(RED));
        // Frame border sits on top of the oversized image.
        assert_eq!(surface.pixel(100, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_large_scale_covers_canvas() {
        let canvas = canvas();
        let mut surface = Surface::new(canvas).unwrap();
        let placement = PlacementState::new(0.0, 0.0, 1000.0, Rotation::Deg0).unwrap();
        let transform = placement_transform(canvas, 4, 4, &placement);
        assert!(transform.is_finite());

        render(&mut surface, Some(&solid(4, 4, RED)), &placement, &empty_frame(canvas));
        assert_eq!(surface.pixel(100, 50), Some(RED));
        assert_eq!(surface.pixel(0, 0), Some(RED));
    }

    #[test]
    fn test_render_without_image_leaves_only_frame() {
        let canvas = canvas();
        let mut surface = Surface::new(canvas).unwrap();
        render(&mut surface, None, &PlacementState::IDENTITY, &empty_frame(canvas));
        assert_eq!(surface.pixel(100, 50), Some(CLEAR));
    }

    #[test]
    fn test_render_clears_previous_content() {
        let canvas = canvas();
        let mut surface = Surface::new(canvas).unwrap();
        let frame = empty_frame(canvas);
        let image = solid(20, 20, RED);

        let moved = PlacementState::new(-60.0, 0.0, 1.0, Rotation::Deg0).unwrap();
        render(&mut surface, Some(&image), &moved, &frame);
        assert_eq!(surface.pixel(40, 50), Some(RED));

        render(&mut surface, Some(&image), &PlacementState::IDENTITY, &frame);
        assert_eq!(surface.pixel(40, 50), Some(CLEAR));
        assert_eq!(surface.pixel(100, 50), Some(RED));
    }

    #[test]
    fn test_undersized_frame_is_stretched() {
        let canvas = canvas();
        let mut surface = Surface::new(canvas).unwrap();
        let frame =
            FrameOverlay::from_rgba(&RgbaImage::from_pixel(20, 10, Rgba([0, 255, 0, 255])))
                .unwrap();
        render(&mut surface, None, &PlacementState::IDENTITY, &frame);
        assert_eq!(surface.pixel(199, 99), Some([0, 255, 0, 255]));
        assert_eq!(surface.pixel(100, 50), Some([0, 255, 0, 255]));
    }
}
