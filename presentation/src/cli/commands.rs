//! CLI command definitions

use campus_chat_domain::Theme;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Theme choice on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// CLI arguments for campus-chat
#[derive(Parser, Debug)]
#[command(name = "campus-chat")]
#[command(author, version, about = "Terminal chat client for a locally hosted AI assistant")]
#[command(long_about = r#"
campus-chat sends your prompt to a locally hosted inference server and prints
the answer as it streams in.

Configuration files are loaded from (in priority order):
1. CAMPUS_CHAT_* environment variables (e.g. CAMPUS_CHAT_SERVER__BASE_URL)
2. --config <path>          Explicit config file
3. ./campus-chat.toml       Project-level config
4. ~/.config/campus-chat/config.toml   Global config

Example:
  campus-chat "Explain Rust lifetimes in two sentences"
  campus-chat --chat --server http://gpu-box.local:8000
  campus-chat --status
"#)]
pub struct Cli {
    /// The prompt to send (not required in chat mode)
    pub prompt: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Inference server base URL
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Maximum tokens to generate (1-1024)
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0-2.0)
    #[arg(long, value_name = "T")]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold (0.0-1.0)
    #[arg(long, value_name = "P")]
    pub top_p: Option<f32>,

    /// Print answers as plain text instead of rendered markdown
    #[arg(long)]
    pub plain: bool,

    /// Code highlight theme (saved for later sessions)
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Query the server status and exit
    #[arg(long, conflicts_with = "health")]
    pub status: bool,

    /// Query the server health endpoint and exit
    #[arg(long)]
    pub health: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the typing indicator and status line
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
