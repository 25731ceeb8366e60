//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod country;
pub mod parse;
pub mod process;

mod output;

use std::path::{Path, PathBuf};

use tracing::debug;

use bgx_core::models::config::BgxConfig;

/// `<config dir>/bgx/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bgx")
        .join("config.json")
}

/// Load the explicit config file, else the default one if it exists, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BgxConfig> {
    if let Some(path) = config_path {
        return Ok(BgxConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(BgxConfig::from_file(&default_path)?)
    } else {
        Ok(BgxConfig::default())
    }
}
