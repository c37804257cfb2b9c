//! Presentation-level configuration
//!
//! Settings for terminal output and REPL behavior, resolved from the file
//! configuration and CLI flags by the binary.

use campus_chat_domain::{RenderMode, Theme};
use std::path::PathBuf;

/// Output configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Markdown or plain rendering of answers
    pub mode: RenderMode,
    /// Code highlight palette
    pub theme: Theme,
    /// Show the typing indicator while generating
    pub show_indicator: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            mode: RenderMode::Markdown,
            theme: Theme::default(),
            show_indicator: true,
        }
    }
}

/// REPL configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Print the status line after each answer
    pub show_status: bool,
    /// Path to history file
    pub history_file: Option<PathBuf>,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            show_status: true,
            history_file: None,
        }
    }
}

impl ReplConfig {
    /// Configured history file, else `<data dir>/campus-chat/history.txt`.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("campus-chat").join("history.txt")))
    }
}
