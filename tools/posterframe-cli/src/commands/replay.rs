//! Replay recorded editor events, then export.

use std::path::PathBuf;

use posterframe_common::config::AppConfig;
use posterframe_editor::EditorSession;
use posterframe_placement_model::event::parse_events;

pub async fn run(
    config: AppConfig,
    image: PathBuf,
    name: String,
    events: PathBuf,
    output: PathBuf,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&events)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", events.display()))?;
    let events = parse_events(&content)
        .map_err(|e| anyhow::anyhow!("Invalid event log {}: {e}", events.display()))?;

    println!("Replaying {} editor events", events.len());

    let mut session = EditorSession::new(config)?;
    session.upload(super::read_upload(&image).await?).await?;
    session.submit_name(&name).await?;

    let mut renders = 0u32;
    for (index, event) in events.iter().enumerate() {
        session
            .handle_event(event)
            .map_err(|e| anyhow::anyhow!("Event {} ({event:?}) rejected: {e}", index + 1))?;
        if session.pump()? {
            renders += 1;
        }
    }

    let placement = session.placement();
    println!(
        "  {renders} preview renders ({} coalesced)",
        session.coalesced_renders()
    );
    println!(
        "  Final placement: offset ({:.1}, {:.1}), zoom {}%, rotation {}°",
        placement.offset_x,
        placement.offset_y,
        placement.zoom_percent(),
        placement.rotation.degrees()
    );

    super::export_and_save(&mut session, &output).await?;
    Ok(())
}
