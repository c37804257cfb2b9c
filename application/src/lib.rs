//! Application layer for campus-chat
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ClientConfig, DEFAULT_STATUS_INTERVAL};
pub use ports::{
    chat_gateway::{ChatGateway, ChunkStream, ResponseBody, TransportError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    preferences::{InMemoryPreferences, PreferenceError, PreferencePort},
    stream_observer::{NoStreamObserver, StreamObserver},
};
pub use use_cases::monitor_status::StatusMonitor;
pub use use_cases::send_message::{ChatController, GenerationActivity, SendError, SendOutcome};
pub use use_cases::stream_session::{StreamError, StreamOutcome, StreamSession};
