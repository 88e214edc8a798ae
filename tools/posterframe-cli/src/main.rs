//! posterframe CLI: compose framed posters from the command line.
//!
//! Usage:
//!   posterframe compose [OPTIONS]   Place an image in the frame and export it
//!   posterframe replay [OPTIONS]    Replay recorded editor events, then export
//!   posterframe check               Load the frame overlay and check its size
//!   posterframe config              Show or write the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use posterframe_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "posterframe",
    about = "Place a photo inside a decorative frame and export a print-ready poster",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a poster in one step
    Compose {
        /// Source image
        #[arg(short, long)]
        image: PathBuf,

        /// Name shown in the download file name
        #[arg(short, long)]
        name: String,

        /// Uniform image scale
        #[arg(long, default_value = "1.0")]
        scale: f64,

        /// Clockwise rotation in degrees (multiple of 90)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        rotate: i32,

        /// Horizontal offset in canvas pixels, in the rotated image frame
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset_x: f64,

        /// Vertical offset in canvas pixels, in the rotated image frame
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset_y: f64,

        /// Frame overlay path or URL (overrides the configuration)
        #[arg(long)]
        frame: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Also print the poster as a data URL
        #[arg(long)]
        data_url: bool,
    },

    /// Replay a JSONL file of editor events, then export
    Replay {
        /// Source image
        #[arg(short, long)]
        image: PathBuf,

        /// Name shown in the download file name
        #[arg(short, long)]
        name: String,

        /// Editor events, one JSON object per line
        #[arg(short, long)]
        events: PathBuf,

        /// Frame overlay path or URL (overrides the configuration)
        #[arg(long)]
        frame: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Load the frame overlay and compare it with the canvas
    Check {
        /// Frame overlay path or URL (overrides the configuration)
        #[arg(long)]
        frame: Option<String>,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the standard location
        #[arg(long)]
        write: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display())),
        None => Ok(AppConfig::load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    posterframe_common::logging::init_logging(&logging);
    tracing::debug!(
        config = ?cli.config,
        canvas_width = config.canvas.width,
        canvas_height = config.canvas.height,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Compose {
            image,
            name,
            scale,
            rotate,
            offset_x,
            offset_y,
            frame,
            output,
            data_url,
        } => {
            if let Some(frame) = frame {
                config.frame.location = frame;
            }
            commands::compose::run(
                config,
                commands::compose::ComposeArgs {
                    image,
                    name,
                    scale,
                    rotate,
                    offset_x,
                    offset_y,
                    output,
                    data_url,
                },
            )
            .await
        }
        Commands::Replay {
            image,
            name,
            events,
            frame,
            output,
        } => {
            if let Some(frame) = frame {
                config.frame.location = frame;
            }
            commands::replay::run(config, image, name, events, output).await
        }
        Commands::Check { frame } => {
            if let Some(frame) = frame {
                config.frame.location = frame;
            }
            commands::check::run(config).await
        }
        Commands::Config { write } => commands::config::run(config, write),
    }
}
