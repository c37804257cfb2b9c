//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod output;
mod repl;
mod server;
mod status;

pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use server::FileServerConfig;
pub use status::FileStatusConfig;

use campus_chat_application::ClientConfig;
use campus_chat_domain::{DomainError, GenerationParams, RenderMode};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("server.base_url '{url}' is not a valid http(s) URL")]
    InvalidBaseUrl { url: String },

    #[error("server.connect_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("status.poll_interval_seconds cannot be 0")]
    InvalidPollInterval,

    #[error("[generation] {0}")]
    InvalidGeneration(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Inference server location
    pub server: FileServerConfig,
    /// Sampling parameters sent with every prompt
    pub generation: GenerationParams,
    /// Background status polling
    pub status: FileStatusConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let url_ok = Url::parse(&self.server.base_url)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !url_ok {
            return Err(ConfigValidationError::InvalidBaseUrl {
                url: self.server.base_url.clone(),
            });
        }

        if self.server.connect_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.status.poll_interval_seconds == 0 {
            return Err(ConfigValidationError::InvalidPollInterval);
        }

        self.generation.validate()?;

        Ok(())
    }

    /// Runtime settings for the chat use cases.
    pub fn to_client_config(&self) -> ClientConfig {
        let render_mode = if self.output.markdown {
            RenderMode::Markdown
        } else {
            RenderMode::Plain
        };

        ClientConfig::default()
            .with_generation(self.generation)
            .with_render_mode(render_mode)
            .with_status_interval(Duration::from_secs(self.status.poll_interval_seconds))
            .with_status_polling(self.status.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_chat_domain::Theme;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[server]
base_url = "http://10.0.0.5:8000"
connect_timeout_seconds = 3

[generation]
max_tokens = 256
temperature = 0.2
top_p = 0.8

[status]
enabled = false
poll_interval_seconds = 30

[output]
color = false
markdown = false
theme = "dark"

[repl]
show_status = false
history_file = "~/.local/share/campus-chat/history.txt"

[logging]
file = "/tmp/campus-chat.log"
conversation_log = "/tmp/conversation.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.server.connect_timeout_seconds, 3);
        assert_eq!(config.server.stream_path, "/api/chat/stream");
        assert_eq!(config.generation.max_tokens, 256);
        assert!(!config.status.enabled);
        assert_eq!(config.status.poll_interval_seconds, 30);
        assert!(!config.output.color);
        assert_eq!(config.output.theme, Some(Theme::Dark));
        assert!(!config.repl.show_status);
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("/tmp/conversation.jsonl")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[generation]
temperature = 1.1
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.generation.temperature, 1.1);
        // Defaults should apply
        assert_eq!(config.generation.max_tokens, 512);
        assert_eq!(config.generation.top_p, 0.9);
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert!(config.output.markdown);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = FileConfig::default();
        config.server.base_url = "localhost:8000".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let mut config = FileConfig::default();
        config.server.connect_timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));

        let mut config = FileConfig::default();
        config.status.poll_interval_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidPollInterval)
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_generation() {
        let mut config = FileConfig::default();
        config.generation.max_tokens = 4000;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidGeneration(_))
        ));
    }

    #[test]
    fn test_to_client_config() {
        let mut config = FileConfig::default();
        config.output.markdown = false;
        config.status.poll_interval_seconds = 5;

        let client = config.to_client_config();
        assert_eq!(client.render_mode, RenderMode::Plain);
        assert_eq!(client.status_interval, Duration::from_secs(5));
        assert!(client.status_polling);
    }
}
