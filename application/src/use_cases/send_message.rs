//! Send Message use case.
//!
//! [`ChatController`] is the entry point the presentation layer talks to. It
//! owns the transcript, enforces one generation at a time, and hands each
//! accepted prompt to a fresh [`StreamSession`].

use crate::config::ClientConfig;
use crate::ports::chat_gateway::ChatGateway;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::stream_observer::StreamObserver;
use crate::use_cases::stream_session::{StreamError, StreamOutcome, StreamSession};
use campus_chat_domain::{
    ChatRequest, DomainError, GenerationParams, MessageId, RenderMode, Transcript,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors returned by [`ChatController::send`].
#[derive(Error, Debug)]
pub enum SendError {
    /// Prompt or parameters rejected before anything was sent.
    #[error(transparent)]
    InvalidRequest(#[from] DomainError),

    /// Another generation is still running.
    #[error("A response is already being generated")]
    Busy,

    #[error(transparent)]
    Stream(#[from] StreamError),
}

/// Result of a successful send.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub user_message: MessageId,
    pub assistant_message: MessageId,
    pub stream: StreamOutcome,
}

/// Shared view of whether a generation is in flight.
///
/// Cloned out of the [`ChatController`] for readers such as the status
/// monitor; only the controller flips it.
#[derive(Debug, Clone, Default)]
pub struct GenerationActivity(Arc<AtomicBool>);

impl GenerationActivity {
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Claim the gate. Returns `false` if it was already held.
    fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Chat session controller.
///
/// At most one generation is in flight; a second `send` while one runs is
/// rejected with [`SendError::Busy`] without touching the transcript.
pub struct ChatController {
    gateway: Arc<dyn ChatGateway>,
    transcript: Arc<Mutex<Transcript>>,
    generating: GenerationActivity,
    active: Mutex<Option<CancellationToken>>,
    params: GenerationParams,
    render_mode: RenderMode,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ChatController {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            gateway,
            transcript: Arc::new(Mutex::new(Transcript::new())),
            generating: GenerationActivity::default(),
            active: Mutex::new(None),
            params: GenerationParams::default(),
            render_mode: RenderMode::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_config(mut self, config: &ClientConfig) -> Self {
        self.params = config.generation;
        self.render_mode = config.render_mode;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> GenerationParams {
        self.params
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn is_generating(&self) -> bool {
        self.generating.is_active()
    }

    /// Handle that follows the generation gate.
    pub fn activity(&self) -> GenerationActivity {
        self.generating.clone()
    }

    /// Snapshot of the transcript.
    pub fn transcript(&self) -> Transcript {
        self.lock_transcript().clone()
    }

    /// Text of the most recent assistant message, if it has any.
    pub fn last_response(&self) -> Option<String> {
        self.lock_transcript()
            .last_assistant()
            .filter(|m| !m.text.is_empty())
            .map(|m| m.text.clone())
    }

    /// Remove every message.
    ///
    /// A running stream keeps reading; its remaining updates target a
    /// message that no longer exists and are dropped.
    pub fn clear(&self) {
        let mut transcript = self.lock_transcript();
        info!("Clearing transcript ({} messages)", transcript.len());
        transcript.clear();
    }

    /// Stop the running generation. Returns `false` when idle.
    pub fn cancel(&self) -> bool {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some(token) => {
                debug!("Cancelling active generation");
                token.cancel();
                true
            }
            None => false,
        }
    }

    fn lock_transcript(&self) -> std::sync::MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a prompt and stream the answer through `observer`.
    pub async fn send(
        &self,
        prompt: &str,
        observer: &dyn StreamObserver,
    ) -> Result<SendOutcome, SendError> {
        let request = ChatRequest::new(prompt, self.params)?;

        if !self.generating.try_begin() {
            warn!("Rejected prompt: generation already in progress");
            return Err(SendError::Busy);
        }

        let token = CancellationToken::new();
        *self.active.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());

        let (user_message, assistant_message) = {
            let mut transcript = self.lock_transcript();
            let user = transcript.push_user(request.prompt.clone());
            let assistant = transcript.push_assistant(self.render_mode);
            (user, assistant)
        };

        let _active = ActiveGeneration {
            controller: self,
            id: assistant_message,
            observer,
        };

        observer.on_generation_start(assistant_message);
        self.conversation_logger.log(ConversationEvent::prompt_submitted(
            assistant_message,
            &request.prompt,
            &self.params,
        ));
        let started = Instant::now();

        let result = StreamSession::new(
            self.gateway.clone(),
            self.transcript.clone(),
            assistant_message,
        )
        .with_params(self.params)
        .with_cancellation(token)
        .run(&request.prompt, observer)
        .await;

        let elapsed_ms = started.elapsed().as_millis();

        match result {
            Ok(stream) => {
                if stream.server_error {
                    observer.on_server_error(assistant_message, stream.server_message.as_deref());
                }
                self.conversation_logger.log(ConversationEvent::response_finished(
                    assistant_message,
                    stream.label(),
                    &stream.text,
                    elapsed_ms,
                ));
                Ok(SendOutcome {
                    user_message,
                    assistant_message,
                    stream,
                })
            }
            Err(err) => {
                let message = err.to_string();
                warn!("{}: generation failed: {}", assistant_message, message);
                if self.lock_transcript().fail(assistant_message, message.clone()) {
                    observer.on_error(assistant_message, &message);
                }
                self.conversation_logger.log(ConversationEvent::response_finished(
                    assistant_message,
                    "failed",
                    err.partial_text(),
                    elapsed_ms,
                ));
                Err(err.into())
            }
        }
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Holds the generation gate for the duration of one send.
///
/// Released on every exit path, including when the send future is dropped.
struct ActiveGeneration<'a> {
    controller: &'a ChatController,
    id: MessageId,
    observer: &'a dyn StreamObserver,
}

impl Drop for ActiveGeneration<'_> {
    fn drop(&mut self) {
        self.controller
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.controller.generating.end();
        self.observer.on_generation_end(self.id);
    }
}
