//! Engine configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::EngineError;

/// Configuration for the CivicPulse core engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minimum seconds between two alerts for the same (area, event type).
    #[serde(default = "default_cooldown_window")]
    pub cooldown_window_secs: u64,

    /// How often the cooldown sweep runs.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Bound on a single external notification send.
    #[serde(default = "default_notify_timeout")]
    pub notify_timeout_secs: u64,

    /// Buffer capacity of each broadcast topic channel.
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_cooldown_window() -> u64 {
    30 * 60
}

fn default_sweep_interval() -> u64 {
    10 * 60
}

fn default_notify_timeout() -> u64 {
    pulse_alerts::DEFAULT_SEND_TIMEOUT_SECS
}

fn default_broadcast_capacity() -> usize {
    256
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cooldown_window_secs: default_cooldown_window(),
            sweep_interval_secs: default_sweep_interval(),
            notify_timeout_secs: default_notify_timeout(),
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file. Missing keys take defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| EngineError::Config(e.to_string()))
    }
}
