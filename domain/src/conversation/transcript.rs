//! Chat transcript (Aggregate)

use super::entities::{MessageId, MessageRecord, MessageState, Role};
use crate::config::RenderMode;

/// The ordered chat history.
///
/// The transcript exclusively owns every [`MessageRecord`]. Streams refer to
/// their target message by [`MessageId`] only; once the transcript is cleared
/// those ids resolve to nothing and updates become no-ops.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<MessageRecord>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        MessageId(self.next_id)
    }

    /// Append a user message.
    pub fn push_user(&mut self, text: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(MessageRecord::user(id, text));
        id
    }

    /// Append an empty assistant message awaiting its first token.
    pub fn push_assistant(&mut self, mode: RenderMode) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(MessageRecord::assistant_pending(id, mode));
        id
    }

    pub fn get(&self, id: MessageId) -> Option<&MessageRecord> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn get_mut(&mut self, id: MessageId) -> Option<&mut MessageRecord> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.get(id).is_some()
    }

    /// Replace the text of a streaming message.
    ///
    /// Returns `false` when the message no longer exists or is already final.
    pub fn update_text(&mut self, id: MessageId, text: &str) -> bool {
        match self.get_mut(id) {
            Some(record) if !record.state.is_final() => {
                record.text.clear();
                record.text.push_str(text);
                record.state = MessageState::Streaming;
                true
            }
            _ => false,
        }
    }

    /// Move a message into a final state.
    ///
    /// Returns `false` when the message no longer exists or is already final.
    pub fn finish(&mut self, id: MessageId, state: MessageState) -> bool {
        match self.get_mut(id) {
            Some(record) if !record.state.is_final() => {
                record.state = state;
                true
            }
            _ => false,
        }
    }

    /// Mark a message as failed, keeping whatever text it already has.
    ///
    /// Unlike [`finish`](Self::finish) this also applies to a message that
    /// already completed, so a late transport error is never swallowed.
    pub fn fail(&mut self, id: MessageId, error: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.state = MessageState::Failed {
                    error: error.into(),
                };
                true
            }
            None => false,
        }
    }

    /// Remove every message. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    pub fn last_assistant(&self) -> Option<&MessageRecord> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
