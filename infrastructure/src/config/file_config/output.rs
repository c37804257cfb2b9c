//! Output configuration from TOML (`[output]` section)

use campus_chat_domain::Theme;
use serde::{Deserialize, Serialize};

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Enable colored terminal output
    pub color: bool,
    /// Render assistant answers as markdown
    pub markdown: bool,
    /// Code highlight palette; the saved preference is used when unset
    pub theme: Option<Theme>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            markdown: true,
            theme: None,
        }
    }
}
