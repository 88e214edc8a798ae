//! Compose a poster in one step.

use std::path::PathBuf;

use posterframe_common::config::AppConfig;
use posterframe_editor::EditorSession;
use posterframe_placement_model::placement::Rotation;

pub struct ComposeArgs {
    pub image: PathBuf,
    pub name: String,
    pub scale: f64,
    pub rotate: i32,
    pub offset_x: f64,
    pub offset_y: f64,
    pub output: PathBuf,
    pub data_url: bool,
}

pub async fn run(config: AppConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let rotation = Rotation::from_degrees(args.rotate)?;

    println!("Composing poster from: {}", args.image.display());
    println!("  Frame: {}", config.frame.location);

    let mut session = EditorSession::new(config)?;
    session.upload(super::read_upload(&args.image).await?).await?;
    session.submit_name(&args.name).await?;

    session.set_scale(args.scale)?;
    for _ in 0..rotation.degrees() / 90 {
        session.rotate()?;
    }
    // The preview starts at 1:1, so a drag of (dx, dy) moves the image by
    // exactly (dx, dy) canvas pixels.
    session.begin_drag(0.0, 0.0)?;
    session.update_drag(args.offset_x, args.offset_y)?;
    session.end_drag()?;

    let placement = session.placement();
    println!(
        "  Placement: offset ({}, {}), zoom {}%, rotation {}°",
        placement.offset_x,
        placement.offset_y,
        placement.zoom_percent(),
        placement.rotation.degrees()
    );

    super::export_and_save(&mut session, &args.output).await?;

    if args.data_url {
        if let Some(artifact) = session.export_artifact() {
            println!("{}", artifact.data_url());
        }
    }

    Ok(())
}
