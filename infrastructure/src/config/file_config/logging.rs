//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

/// Raw logging configuration from TOML
///
/// Both paths are optional. Without `file`, diagnostics go to stderr; without
/// `conversation_log`, no transcript is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Diagnostic log file (tracing output)
    pub file: Option<String>,
    /// JSONL conversation log
    pub conversation_log: Option<String>,
}
