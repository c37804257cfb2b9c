//! Configuration file loading for campus-chat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CAMPUS_CHAT_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./campus-chat.toml` or `./.campus-chat.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/campus-chat/config.toml`
//! 5. Fallback: `~/.config/campus-chat/config.toml`
//! 6. Default values

mod file_config;
mod loader;
pub mod paths;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FileOutputConfig, FileReplConfig,
    FileServerConfig, FileStatusConfig,
};
pub use loader::ConfigLoader;
