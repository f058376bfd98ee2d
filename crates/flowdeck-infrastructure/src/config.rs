//! Configuration loading.
//!
//! Reads `config.toml` from the Flowdeck config directory. A missing file
//! yields the default configuration; a malformed file is an error (unlike
//! state blobs, configuration is user-authored and silently discarding it
//! would hide typos).

use std::fs;
use std::path::Path;

use flowdeck_core::Result;
use flowdeck_core::config::AppConfig;

use crate::paths::FlowdeckPaths;

/// Loads the application configuration from the default location.
pub fn load_config() -> Result<AppConfig> {
    let path = FlowdeckPaths::config_file()?;
    load_config_from(&path)
}

/// Loads the application configuration from `path`.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}
