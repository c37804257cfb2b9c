//! Stream observer port
//!
//! Defines the render interface the streaming core drives. Implementations
//! live in the presentation layer (console, tests) and decide how a message
//! is drawn; the core only says *what* changed.

use campus_chat_domain::MessageId;

/// Callbacks fired while an assistant message is generated.
///
/// `on_token` and `on_complete` always receive the *complete* accumulated
/// text, never a delta, so a renderer that re-parses markdown from scratch
/// stays correct. Calls for a message that was removed from the transcript
/// are suppressed by the caller.
pub trait StreamObserver: Send + Sync {
    /// A generation was accepted; show the typing indicator.
    fn on_generation_start(&self, _id: MessageId) {}

    /// The response stream opened; replace the typing indicator with an
    /// empty live region.
    fn on_stream_open(&self, _id: MessageId) {}

    /// A token arrived. `text` is everything received so far.
    fn on_token(&self, _id: MessageId, _text: &str) {}

    /// The stream ended with text; final render pass.
    fn on_complete(&self, _id: MessageId, _text: &str) {}

    /// The stream ended without any text.
    fn on_empty(&self, _id: MessageId) {}

    /// The user cancelled; `text` is what arrived before the cancel.
    fn on_cancelled(&self, _id: MessageId, _text: &str) {}

    /// The server sent an `error` event during the stream.
    fn on_server_error(&self, _id: MessageId, _message: Option<&str>) {}

    /// The request failed. Text already shown stays visible.
    fn on_error(&self, _id: MessageId, _message: &str) {}

    /// Always called last, on every exit path: remove any lingering typing
    /// indicator and re-enable input.
    fn on_generation_end(&self, _id: MessageId) {}
}

/// No-op observer for when nothing needs to be drawn
pub struct NoStreamObserver;

impl StreamObserver for NoStreamObserver {}
