//! Domain layer for campus-chat
//!
//! This crate contains the core logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Stream framing
//!
//! The inference server streams its answer as newline-delimited
//! Server-Sent-Events. [`FrameReassembler`] turns raw byte chunks into
//! classified [`ProtocolLine`]s regardless of where the chunk boundaries fall.
//!
//! ## Transcript
//!
//! [`Transcript`] owns every [`MessageRecord`] of the chat. Streams address
//! their target message by [`MessageId`], which makes a mid-stream clear safe.

pub mod config;
pub mod conversation;
pub mod core;
pub mod generation;
pub mod status;
pub mod stream;

// Re-export commonly used types
pub use config::{RenderMode, Theme};
pub use conversation::{
    entities::{MessageId, MessageRecord, MessageState, Role},
    transcript::Transcript,
};
pub use crate::core::{error::DomainError, string::preview};
pub use generation::{ChatRequest, GenerationParams, GenerationStats, MAX_PROMPT_CHARS};
pub use status::{HealthReport, ModelStatus, ServerStatus, StatusIndicator};
pub use stream::{
    decoder::Utf8StreamDecoder,
    line::{ProtocolLine, unescape_payload},
    reassembler::FrameReassembler,
};
