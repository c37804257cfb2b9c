//! Server status reporting.
//!
//! The inference server exposes `/status` and `/health`. Their payloads are
//! decoded into [`ServerStatus`] / [`HealthReport`] and folded into a
//! three-state [`StatusIndicator`] for display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Model section of the `/status` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelStatus {
    pub loaded: bool,
    pub model_path: Option<String>,
}

/// Payload of `GET /status`. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerStatus {
    pub status: String,
    pub model: ModelStatus,
    pub current_users: u32,
    pub max_users: u32,
}

impl ServerStatus {
    /// Running with a loaded model.
    pub fn is_ready(&self) -> bool {
        self.status == "running" && self.model.loaded
    }
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthReport {
    pub status: String,
    pub model_loaded: bool,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Three-state connection indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusIndicator {
    /// Server running and model loaded.
    Connected { current_users: u32, max_users: u32 },
    /// Reachable but not ready, or busy generating.
    Warning(String),
    /// Unreachable or returned garbage.
    Error(String),
}

impl StatusIndicator {
    pub const MODEL_LOADING: &'static str = "Server OK, Model Loading...";
    pub const GENERATING: &'static str = "Generating...";
    pub const CONNECTION_ERROR: &'static str = "Connection Error";

    pub fn from_status(status: &ServerStatus) -> Self {
        if status.is_ready() {
            StatusIndicator::Connected {
                current_users: status.current_users,
                max_users: status.max_users,
            }
        } else {
            StatusIndicator::Warning(Self::MODEL_LOADING.to_string())
        }
    }

    pub fn generating() -> Self {
        StatusIndicator::Warning(Self::GENERATING.to_string())
    }

    pub fn connection_error() -> Self {
        StatusIndicator::Error(Self::CONNECTION_ERROR.to_string())
    }

    /// Short class name: `connected`, `warning` or `error`.
    pub fn level(&self) -> &'static str {
        match self {
            StatusIndicator::Connected { .. } => "connected",
            StatusIndicator::Warning(_) => "warning",
            StatusIndicator::Error(_) => "error",
        }
    }
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusIndicator::Connected {
                current_users,
                max_users,
            } => write!(f, "Online • {}/{} users", current_users, max_users),
            StatusIndicator::Warning(text) | StatusIndicator::Error(text) => f.write_str(text),
        }
    }
}
