//! Application configuration types.
//!
//! Loaded from `config.toml` under the platform config directory by the
//! infrastructure crate. Profile-level API settings take precedence over
//! the values here (the settings page writes them onto the profile).

use serde::{Deserialize, Serialize};

/// Root configuration for a Flowdeck deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote workflow API connection, when configured globally.
    #[serde(default)]
    pub api: Option<ApiSettings>,
    /// Milliseconds of artificial latency injected into simulated auth
    /// operations. Zero disables the delay (tests rely on that).
    #[serde(default = "default_latency_ms")]
    pub simulated_latency_ms: u64,
}

/// Connection settings for the remote workflow API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub api_key: String,
}

fn default_latency_ms() -> u64 {
    1000
}
