//! Status polling configuration from TOML (`[status]` section)

use serde::{Deserialize, Serialize};

/// Raw status polling configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStatusConfig {
    /// Poll `/status` in the background while chatting
    pub enabled: bool,
    /// Seconds between polls
    pub poll_interval_seconds: u64,
}

impl Default for FileStatusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_seconds: 10,
        }
    }
}
