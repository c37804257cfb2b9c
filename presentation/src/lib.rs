//! Presentation layer for campus-chat
//!
//! This crate contains CLI definitions, the terminal renderer, the typing
//! indicator and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;
pub mod render;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, ThemeArg};
pub use config::{OutputConfig, ReplConfig};
pub use output::{ConsoleRenderer, format_health, format_status};
pub use progress::TypingIndicator;
pub use render::MarkdownRenderer;
