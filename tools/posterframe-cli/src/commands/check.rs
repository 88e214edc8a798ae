//! Check the frame overlay against the canvas.

use std::time::Duration;

use posterframe_common::config::AppConfig;
use posterframe_placement_model::geometry::CanvasSize;
use posterframe_render_engine::{FrameLoader, FrameSource};

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    println!("posterframe Frame Check");
    println!("{}", "=".repeat(50));

    let canvas = CanvasSize::new(config.canvas.width, config.canvas.height)?;
    let source = FrameSource::from(&config.frame);
    println!("[OK] Canvas: {canvas} ({:.2} MP)", canvas.pixel_count() as f64 / 1e6);
    println!("     Frame source: {}", source.describe());

    let loader = FrameLoader::new(Duration::from_millis(config.frame.timeout_ms))?;
    match loader.load(&source, canvas).await {
        Ok(frame) if frame.matches(canvas) => {
            println!("[OK] Frame overlay: {}x{}", frame.width(), frame.height());
        }
        Ok(frame) => {
            println!(
                "[WARN] Frame overlay is {}x{}, canvas is {canvas}; it will be stretched",
                frame.width(),
                frame.height()
            );
            let frame_aspect = frame.width() as f64 / frame.height() as f64;
            if (frame_aspect - canvas.aspect_ratio()).abs() > 1e-3 {
                println!(
                    "[WARN] Aspect ratio {frame_aspect:.3} differs from the canvas {:.3}",
                    canvas.aspect_ratio()
                );
            }
        }
        Err(e) => {
            println!("[FAIL] Frame overlay: {e}");
            return Err(e.into());
        }
    }

    match &config.submission.endpoint {
        Some(endpoint) => println!("[OK] Name submission: {endpoint}"),
        None => println!("[OK] Name submission: disabled"),
    }

    Ok(())
}
