//! Show or write the effective configuration.

use posterframe_common::config::{config_file_path, AppConfig};

pub fn run(config: AppConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&config)?);

    if write {
        let path = config.save()?;
        println!("Configuration written to {}", path.display());
    } else {
        println!("(config file: {})", config_file_path().display());
    }
    Ok(())
}
