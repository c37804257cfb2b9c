//! Conversation entities

use crate::config::RenderMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a message within one transcript.
///
/// Ids are never reused, even after the transcript is cleared, so a stale id
/// held by an in-flight stream can never address a newer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Lifecycle state of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MessageState {
    /// Waiting for the first token (typing indicator shown).
    Pending,
    /// Tokens are arriving.
    Streaming,
    /// Stream ended with text.
    Complete,
    /// Stream ended without producing any text.
    Empty,
    /// Stream failed. Text received before the failure is kept.
    Failed { error: String },
    /// Stopped by the user. Text received so far is kept.
    Cancelled,
}

impl MessageState {
    /// Whether the message can no longer change.
    pub fn is_final(&self) -> bool {
        !matches!(self, MessageState::Pending | MessageState::Streaming)
    }
}

/// A message in the transcript (Entity)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub mode: RenderMode,
    pub state: MessageState,
}

impl MessageRecord {
    /// Text shown for an assistant message whose stream produced nothing.
    pub const EMPTY_PLACEHOLDER: &'static str = "(No response generated)";

    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            text: text.into(),
            mode: RenderMode::Plain,
            state: MessageState::Complete,
        }
    }

    pub fn assistant_pending(id: MessageId, mode: RenderMode) -> Self {
        Self {
            id,
            role: Role::Assistant,
            text: String::new(),
            mode,
            state: MessageState::Pending,
        }
    }

    /// Text to display: the placeholder for an empty response, otherwise the text.
    pub fn display_text(&self) -> &str {
        match self.state {
            MessageState::Empty => Self::EMPTY_PLACEHOLDER,
            _ => &self.text,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            MessageState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_display() {
        assert_eq!(MessageId(42).to_string(), "msg-42");
    }

    #[test]
    fn test_final_states() {
        assert!(!MessageState::Pending.is_final());
        assert!(!MessageState::Streaming.is_final());
        assert!(MessageState::Complete.is_final());
        assert!(MessageState::Empty.is_final());
        assert!(MessageState::Cancelled.is_final());
        assert!(MessageState::Failed { error: "x".into() }.is_final());
    }

    #[test]
    fn test_empty_message_shows_placeholder() {
        let mut record = MessageRecord::assistant_pending(MessageId(1), RenderMode::Markdown);
        record.state = MessageState::Empty;
        assert_eq!(record.display_text(), MessageRecord::EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_failed_message_keeps_text() {
        let mut record = MessageRecord::assistant_pending(MessageId(1), RenderMode::Plain);
        record.text = "partial".into();
        record.state = MessageState::Failed {
            error: "Server error: 503".into(),
        };
        assert_eq!(record.display_text(), "partial");
        assert_eq!(record.error(), Some("Server error: 503"));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
