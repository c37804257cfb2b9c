//! Server connection configuration from TOML (`[server]` section)

use crate::http::ServerEndpoint;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw server configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Base URL of the inference server
    pub base_url: String,
    /// Streaming chat endpoint path
    pub stream_path: String,
    /// Status endpoint path
    pub status_path: String,
    /// Health endpoint path
    pub health_path: String,
    /// Connect timeout (also bounds status and health requests)
    pub connect_timeout_seconds: u64,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        let endpoint = ServerEndpoint::default();
        Self {
            base_url: endpoint.base_url,
            stream_path: endpoint.stream_path,
            status_path: endpoint.status_path,
            health_path: endpoint.health_path,
            connect_timeout_seconds: endpoint.connect_timeout.as_secs(),
        }
    }
}

impl FileServerConfig {
    pub fn to_endpoint(&self) -> ServerEndpoint {
        ServerEndpoint {
            base_url: self.base_url.clone(),
            stream_path: self.stream_path.clone(),
            status_path: self.status_path.clone(),
            health_path: self.health_path.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
        }
    }
}
