//! End-to-end compositing checks at print resolution.

use std::sync::Arc;
use std::time::Duration;

use image::{Rgba, RgbaImage};

use posterframe_placement_model::geometry::CanvasSize;
use posterframe_placement_model::placement::{PlacementState, Rotation};
use posterframe_render_engine::compositor::{self, placed_bounds};
use posterframe_render_engine::{
    export_composite, load_frame_and_export, FrameLoader, FrameOverlay, FrameSource, JpegQuality,
    SourceImage, Surface,
};

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];
const BORDER: u32 = 100;

/// Opaque blue border with a transparent window.
fn bordered_frame_pixels(canvas: CanvasSize) -> RgbaImage {
    RgbaImage::from_fn(canvas.width, canvas.height, |x, y| {
        let inside = x >= BORDER
            && y >= BORDER
            && x < canvas.width - BORDER
            && y < canvas.height - BORDER;
        if inside {
            Rgba(CLEAR)
        } else {
            Rgba(BLUE)
        }
    })
}

fn bordered_frame(canvas: CanvasSize) -> FrameOverlay {
    FrameOverlay::from_rgba(&bordered_frame_pixels(canvas)).unwrap()
}

fn solid(width: u32, height: u32) -> SourceImage {
    SourceImage::from_rgba(&RgbaImage::from_pixel(width, height, Rgba(RED))).unwrap()
}

fn scenario_placement() -> PlacementState {
    PlacementState::new(50.0, -20.0, 1.5, Rotation::Deg90).unwrap()
}

fn close_to(actual: [u8; 3], expected: [u8; 3]) -> bool {
    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| (*a as i16 - *e as i16).abs() <= 24)
}

#[test]
fn rotated_scaled_offset_image_lands_in_expected_bounds() {
    let canvas = CanvasSize::PRINT;
    let placement = scenario_placement();

    // 1500x1200 displayed, offset (50, -20) in the image frame, then a
    // clockwise quarter turn about (1897.5, 1500).
    let (min, max) = placed_bounds(canvas, 1000, 800, &placement);
    assert!((min.x - (1897.5 - 580.0)).abs() < 1e-9);
    assert!((max.x - (1897.5 + 620.0)).abs() < 1e-9);
    assert!((min.y - (1500.0 - 700.0)).abs() < 1e-9);
    assert!((max.y - (1500.0 + 800.0)).abs() < 1e-9);

    let mut surface = Surface::new(canvas).unwrap();
    compositor::render(
        &mut surface,
        Some(&solid(1000, 800)),
        &placement,
        &bordered_frame(canvas),
    );

    assert_eq!(surface.pixel(1897, 1500), Some(RED));
    assert_eq!(surface.pixel(1320, 1500), Some(RED));
    assert_eq!(surface.pixel(2514, 1500), Some(RED));
    assert_eq!(surface.pixel(1897, 803), Some(RED));
    assert_eq!(surface.pixel(1897, 2296), Some(RED));

    assert_eq!(surface.pixel(1312, 1500), Some(CLEAR));
    assert_eq!(surface.pixel(2522, 1500), Some(CLEAR));
    assert_eq!(surface.pixel(1897, 795), Some(CLEAR));
    assert_eq!(surface.pixel(1897, 2305), Some(CLEAR));

    // The frame border stays opaque over everything.
    assert_eq!(surface.pixel(10, 10), Some(BLUE));
    assert_eq!(surface.pixel(3790, 2995), Some(BLUE));
}

#[test]
fn exported_jpeg_is_full_canvas() {
    let canvas = CanvasSize::PRINT;
    let artifact = export_composite(
        Some(&solid(1000, 800)),
        &scenario_placement(),
        &bordered_frame(canvas),
        canvas,
        JpegQuality::from_fraction(0.95).unwrap(),
    )
    .unwrap();

    assert_eq!(artifact.quality.value(), 95);
    let decoded = image::load_from_memory(&artifact.jpeg).unwrap().into_rgb8();
    assert_eq!(decoded.dimensions(), (3795, 3000));

    assert!(close_to(decoded.get_pixel(1897, 1500).0, [255, 0, 0]));
    assert!(close_to(decoded.get_pixel(50, 1500).0, [0, 0, 255]));
    // Uncovered transparent pixels flatten to black.
    assert!(close_to(decoded.get_pixel(400, 1500).0, [0, 0, 0]));
}

#[test]
fn export_dimensions_ignore_source_aspect() {
    let canvas = CanvasSize::new(300, 240).unwrap();
    let frame = bordered_frame(canvas);

    for (w, h) in [(1, 1), (4000, 10), (10, 4000), (300, 240), (999, 1001)] {
        let artifact = export_composite(
            Some(&solid(w, h)),
            &PlacementState::IDENTITY,
            &frame,
            canvas,
            JpegQuality::default(),
        )
        .unwrap();
        let decoded = image::load_from_memory(&artifact.jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (300, 240), "source {w}x{h}");
    }
}

#[test]
fn no_image_composite_is_the_frame_alone() {
    let canvas = CanvasSize::new(320, 200).unwrap();
    let pixels = bordered_frame_pixels(canvas);
    let frame = FrameOverlay::from_rgba(&pixels).unwrap();

    let mut surface = Surface::new(canvas).unwrap();
    compositor::render(&mut surface, None, &scenario_placement(), &frame);

    assert_eq!(surface.to_rgba_image(), pixels);
}

#[test]
fn reset_then_render_matches_fresh_render() {
    let canvas = CanvasSize::new(320, 200).unwrap();
    let frame = bordered_frame(canvas);
    let image = solid(90, 60);

    let mut fresh = Surface::new(canvas).unwrap();
    compositor::render(&mut fresh, Some(&image), &PlacementState::IDENTITY, &frame);

    let mut placement = PlacementState::new(-33.0, 12.5, 2.25, Rotation::Deg270).unwrap();
    let mut reused = Surface::new(canvas).unwrap();
    compositor::render(&mut reused, Some(&image), &placement, &frame);
    assert_ne!(reused.data(), fresh.data());

    placement.reset();
    compositor::render(&mut reused, Some(&image), &placement, &frame);
    assert_eq!(reused.data(), fresh.data());
}

#[test]
fn four_rotations_render_like_none() {
    let canvas = CanvasSize::new(320, 200).unwrap();
    let frame = bordered_frame(canvas);
    let image = solid(120, 50);

    let base = PlacementState::new(15.0, -7.0, 0.8, Rotation::Deg0).unwrap();
    let mut turned = base;
    for _ in 0..4 {
        turned.rotate();
    }

    let mut a = Surface::new(canvas).unwrap();
    let mut b = Surface::new(canvas).unwrap();
    compositor::render(&mut a, Some(&image), &base, &frame);
    compositor::render(&mut b, Some(&image), &turned, &frame);
    assert_eq!(a.data(), b.data());
}

#[tokio::test]
async fn frame_failure_produces_no_artifact_and_retry_succeeds() {
    let canvas = CanvasSize::new(64, 48).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    let source = FrameSource::File(path.clone());
    let loader = FrameLoader::new(Duration::from_secs(2)).unwrap();
    let image = Some(Arc::new(solid(10, 10)));

    let err = load_frame_and_export(
        &loader,
        &source,
        image.clone(),
        PlacementState::IDENTITY,
        canvas,
        JpegQuality::default(),
    )
    .await
    .unwrap_err();
    assert!(err.is_retryable());

    bordered_frame_pixels(canvas).save(&path).unwrap();
    let artifact = load_frame_and_export(
        &loader,
        &source,
        image,
        PlacementState::IDENTITY,
        canvas,
        JpegQuality::default(),
    )
    .await
    .unwrap();
    assert_eq!(artifact.size, canvas);
    assert!(artifact.byte_len() > 0);
}
