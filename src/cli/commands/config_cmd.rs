//! Configuration management commands.

use crate::cli::icons::{info, warn};
use crate::config::Config;

/// Print the effective configuration as JSON.
pub fn cmd_config_show(config: &Config) -> anyhow::Result<()> {
    match &config.source_path {
        Some(path) => eprintln!("{} Loaded from {}", info(), path.display()),
        None => eprintln!(
            "{} No config file found; showing defaults with environment overrides",
            warn()
        ),
    }
    println!("{}", serde_json::to_string_pretty(&config.to_display_json())?);
    Ok(())
}
