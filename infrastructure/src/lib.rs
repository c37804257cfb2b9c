//! Infrastructure layer for campus-chat
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod logging;
pub mod prefs;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileReplConfig, FileServerConfig, FileStatusConfig,
};
pub use http::{HttpChatGateway, HttpError, ServerEndpoint};
pub use logging::JsonlConversationLogger;
pub use prefs::{PreferenceStore, Preferences, PrefsError};
