//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("Invalid generation parameters: {0}")]
    InvalidParams(String),
}

impl DomainError {
    /// Check if this error was caused by the user's prompt text
    pub fn is_prompt_error(&self) -> bool {
        matches!(self, DomainError::InvalidPrompt(_))
    }
}
