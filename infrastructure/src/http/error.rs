//! Error types for the HTTP adapter

use campus_chat_application::TransportError;
use thiserror::Error;

/// Errors that can occur while setting up the HTTP gateway
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Map a `reqwest` failure onto the port's error kinds.
pub(crate) fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else if err.is_body() {
        TransportError::Read(err.to_string())
    } else {
        TransportError::Connect(err.to_string())
    }
}

/// Map a non-success HTTP status.
pub(crate) fn status_error(status: reqwest::StatusCode) -> TransportError {
    TransportError::Status {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
    }
}
