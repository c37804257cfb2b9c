//! Conversation transcript domain.
//!
//! - [`entities::MessageRecord`]: one user or assistant message
//! - [`transcript::Transcript`]: the ordered chat history that owns all records

pub mod entities;
pub mod transcript;
