//! Unified path management for Flowdeck state files.
//!
//! All persisted state and configuration lives under the platform config
//! directory (e.g. `~/.config/flowdeck/` on Linux):
//!
//! ```text
//! ~/.config/flowdeck/
//! ├── config.toml      # Application configuration
//! └── state/           # Persisted key-value blobs (JsonFileStore)
//!     ├── flowdeck-session.json
//!     ├── flowdeck-profile.json
//!     └── flowdeck-workflows.json
//! ```

use std::path::PathBuf;

use flowdeck_core::FlowdeckError;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for FlowdeckError {
    fn from(err: PathError) -> Self {
        FlowdeckError::config(err.to_string())
    }
}

/// Unified path management for Flowdeck.
pub struct FlowdeckPaths;

impl FlowdeckPaths {
    /// Returns the Flowdeck configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/flowdeck/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("flowdeck"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the directory holding persisted key-value blobs.
    pub fn state_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("state"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_dir_is_under_config_dir() {
        let config_dir = FlowdeckPaths::config_dir().unwrap();
        let state_dir = FlowdeckPaths::state_dir().unwrap();

        assert!(state_dir.starts_with(&config_dir));
        assert!(state_dir.ends_with("state"));
    }

    #[test]
    fn config_file_is_toml() {
        let file = FlowdeckPaths::config_file().unwrap();
        assert_eq!(file.extension().unwrap(), "toml");
    }
}
