//! Port for structured conversation logging.
//!
//! Records what was asked and how each answer ended, in a machine-readable
//! form (JSONL in the infrastructure adapter). This is separate from
//! `tracing`, which carries human-readable diagnostics.

use campus_chat_domain::{GenerationParams, MessageId};
use serde_json::{Value, json};

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "prompt_submitted", "response_finished").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// A prompt was accepted and is about to be sent.
    pub fn prompt_submitted(id: MessageId, prompt: &str, params: &GenerationParams) -> Self {
        Self::new(
            "prompt_submitted",
            json!({
                "message_id": id.to_string(),
                "prompt": prompt,
                "max_tokens": params.max_tokens,
                "temperature": params.temperature,
                "top_p": params.top_p,
            }),
        )
    }

    /// A response stream ended, successfully or not.
    pub fn response_finished(id: MessageId, outcome: &str, text: &str, elapsed_ms: u128) -> Self {
        Self::new(
            "response_finished",
            json!({
                "message_id": id.to_string(),
                "outcome": outcome,
                "chars": text.chars().count(),
                "text": text,
                "elapsed_ms": elapsed_ms as u64,
            }),
        )
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible: a broken log must never interrupt a
/// chat. Implementations swallow their own I/O errors.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
