//! Chat Gateway port
//!
//! Defines the interface for talking to the inference server.

use async_trait::async_trait;
use campus_chat_domain::{ChatRequest, HealthReport, ServerStatus};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur while talking to the inference server
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Server error: {code} {reason}")]
    Status { code: u16, reason: String },

    #[error("Connection error: {0}")]
    Connect(String),

    #[error("Read error: {0}")]
    Read(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Timeout")]
    Timeout,
}

/// Boxed stream of body chunks, in delivery order.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, TransportError>> + Send>>;

/// Streaming response body of a chat request.
///
/// Dropping the body releases the underlying connection.
pub struct ResponseBody {
    chunks: ChunkStream,
}

impl ResponseBody {
    pub fn new(chunks: ChunkStream) -> Self {
        Self { chunks }
    }

    /// Build a body from any chunk stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Vec<u8>, TransportError>> + Send + 'static,
    {
        Self::new(Box::pin(stream))
    }

    /// Wait for the next chunk. `None` means the server closed the stream.
    pub async fn next_chunk(&mut self) -> Option<Result<Vec<u8>, TransportError>> {
        self.chunks.next().await
    }
}

/// Gateway to the inference server
///
/// This port defines how the application layer reaches the server.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Post a chat request and open its streaming response body.
    ///
    /// A non-success HTTP status is reported as [`TransportError::Status`]
    /// before any chunk is read.
    async fn open_stream(&self, request: &ChatRequest) -> Result<ResponseBody, TransportError>;

    /// Fetch `/status`.
    async fn server_status(&self) -> Result<ServerStatus, TransportError>;

    /// Fetch `/health`.
    async fn health(&self) -> Result<HealthReport, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_response_body_yields_chunks_in_order() {
        let mut body = ResponseBody::from_stream(futures::stream::iter(vec![
            Ok(b"a".to_vec()),
            Ok(b"b".to_vec()),
        ]));
        assert_eq!(body.next_chunk().await, Some(Ok(b"a".to_vec())));
        assert_eq!(body.next_chunk().await, Some(Ok(b"b".to_vec())));
        assert_eq!(body.next_chunk().await, None);
    }

    #[test]
    fn test_status_error_display() {
        let err = TransportError::Status {
            code: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Server error: 503 Service Unavailable");
    }
}
