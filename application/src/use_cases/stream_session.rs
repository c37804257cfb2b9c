//! Stream Session use case.
//!
//! Owns the lifecycle of one streamed response: post the prompt, read the
//! body chunk by chunk, reassemble and classify lines, accumulate token text
//! and drive the [`StreamObserver`] after each token.
//!
//! A session is created per submitted prompt and consumed by [`StreamSession::run`].
//! The only suspension points are opening the stream and waiting for the
//! next chunk; both race against the session's cancellation token.

use crate::ports::chat_gateway::{ChatGateway, ResponseBody, TransportError};
use crate::ports::stream_observer::StreamObserver;
use campus_chat_domain::{
    ChatRequest, DomainError, FrameReassembler, GenerationParams, GenerationStats, MessageId,
    MessageState, ProtocolLine, Transcript, preview,
};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Errors that end a stream session early.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error(transparent)]
    InvalidRequest(#[from] DomainError),

    /// The request could not be sent or was refused.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body broke off after some text had already arrived.
    #[error("{source}")]
    Interrupted {
        partial: String,
        #[source]
        source: TransportError,
    },
}

impl StreamError {
    /// Text received before the failure, if any.
    pub fn partial_text(&self) -> &str {
        match self {
            StreamError::Interrupted { partial, .. } => partial,
            _ => "",
        }
    }
}

/// Result of a stream that ran to its end (or was cancelled).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamOutcome {
    /// All token text, in arrival order.
    pub text: String,
    /// An `event: done` line was seen.
    pub completed: bool,
    /// An `event: error` line was seen.
    pub server_error: bool,
    /// Message carried by the server's error event, if any.
    pub server_message: Option<String>,
    /// Summary carried by the server's done event, if any.
    pub stats: Option<GenerationStats>,
    /// Number of body chunks read.
    pub chunks: usize,
    /// Unterminated trailing line dropped at end of stream.
    pub truncated: Option<String>,
    /// The user cancelled before the server closed the stream.
    pub cancelled: bool,
    /// The target message disappeared from the transcript mid-stream.
    pub detached: bool,
}

impl StreamOutcome {
    /// Short label used in logs: `complete`, `empty`, `cancelled`.
    pub fn label(&self) -> &'static str {
        if self.cancelled {
            "cancelled"
        } else if self.text.is_empty() {
            "empty"
        } else {
            "complete"
        }
    }
}

/// One streamed response, bound to one assistant message.
pub struct StreamSession {
    gateway: Arc<dyn ChatGateway>,
    transcript: Arc<Mutex<Transcript>>,
    message_id: MessageId,
    params: GenerationParams,
    cancel: CancellationToken,
}

impl StreamSession {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        transcript: Arc<Mutex<Transcript>>,
        message_id: MessageId,
    ) -> Self {
        Self {
            gateway,
            transcript,
            message_id,
            params: GenerationParams::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn with_transcript<R>(&self, f: impl FnOnce(&mut Transcript) -> R) -> R {
        let mut transcript = self.transcript.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut transcript)
    }

    /// Send `prompt` and consume the streamed answer.
    pub async fn run(
        self,
        prompt: &str,
        observer: &dyn StreamObserver,
    ) -> Result<StreamOutcome, StreamError> {
        let request = ChatRequest::new(prompt, self.params)?;
        let id = self.message_id;

        info!(
            "Streaming {} (prompt: \"{}\", max_tokens={}, temperature={}, top_p={})",
            id,
            preview(&request.prompt, 60),
            request.max_tokens,
            request.temperature,
            request.top_p
        );

        let mut outcome = StreamOutcome::default();

        let body = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            opened = self.gateway.open_stream(&request) => Some(opened?),
        };
        let Some(body) = body else {
            return Ok(self.finish_cancelled(outcome, observer));
        };

        if self.with_transcript(|t| t.contains(id)) {
            observer.on_stream_open(id);
        }

        let reassembler = match self.read_body(body, &mut outcome, observer).await {
            Ok(Some(reassembler)) => reassembler,
            Ok(None) => return Ok(self.finish_cancelled(outcome, observer)),
            Err(source) => {
                warn!("{}: stream interrupted after {} chunks: {}", id, outcome.chunks, source);
                return Err(StreamError::Interrupted {
                    partial: outcome.text,
                    source,
                });
            }
        };

        if let Some(fragment) = reassembler.finish() {
            warn!(
                "{}: stream ended mid-line, dropping {} bytes: \"{}\"",
                id,
                fragment.len(),
                preview(&fragment, 40)
            );
            outcome.truncated = Some(fragment);
        }

        if outcome.text.is_empty() {
            if self.with_transcript(|t| t.finish(id, MessageState::Empty)) {
                observer.on_empty(id);
            }
        } else if self.with_transcript(|t| t.finish(id, MessageState::Complete)) {
            observer.on_complete(id, &outcome.text);
        }

        debug!(
            "{}: stream finished ({} chunks, {} chars, done={}, server_error={})",
            id,
            outcome.chunks,
            outcome.text.len(),
            outcome.completed,
            outcome.server_error
        );

        Ok(outcome)
    }

    /// Read chunks until end of stream.
    ///
    /// Returns the reassembler for the end-of-stream flush, or `None` when
    /// cancelled. The body is dropped on return, releasing the connection.
    async fn read_body(
        &self,
        mut body: ResponseBody,
        outcome: &mut StreamOutcome,
        observer: &dyn StreamObserver,
    ) -> Result<Option<FrameReassembler>, TransportError> {
        let mut reassembler = FrameReassembler::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(None),
                next = body.next_chunk() => next,
            };

            let Some(chunk) = next else {
                return Ok(Some(reassembler));
            };
            let chunk = chunk?;
            outcome.chunks += 1;

            for line in reassembler.feed(&chunk) {
                self.apply_line(line, outcome, observer);
            }
        }
    }

    fn apply_line(&self, line: ProtocolLine, outcome: &mut StreamOutcome, observer: &dyn StreamObserver) {
        let id = self.message_id;

        match line {
            ProtocolLine::Token(token) => {
                outcome.text.push_str(&token);
                if self.with_transcript(|t| t.update_text(id, &outcome.text)) {
                    observer.on_token(id, &outcome.text);
                } else if !outcome.detached {
                    debug!("{}: message no longer in transcript, rendering stopped", id);
                    outcome.detached = true;
                }
            }
            ProtocolLine::Done => {
                info!("{}: stream complete", id);
                outcome.completed = true;
            }
            ProtocolLine::Error => {
                warn!("{}: server reported a stream error", id);
                outcome.server_error = true;
            }
            ProtocolLine::EventData { event, data } => match event.as_str() {
                "done" => {
                    outcome.stats = GenerationStats::parse(&data);
                    if let Some(stats) = &outcome.stats {
                        info!(
                            "{}: {} tokens in {:.2}s",
                            id, stats.token_count, stats.generation_time
                        );
                    }
                }
                "error" => {
                    warn!("{}: server error: {}", id, data);
                    outcome.server_message = Some(data);
                }
                _ => trace!("{}: ignoring {} event data: {}", id, event, data),
            },
        }
    }

    fn finish_cancelled(&self, mut outcome: StreamOutcome, observer: &dyn StreamObserver) -> StreamOutcome {
        let id = self.message_id;
        info!("{}: cancelled after {} chars", id, outcome.text.len());
        outcome.cancelled = true;
        if self.with_transcript(|t| t.finish(id, MessageState::Cancelled)) {
            observer.on_cancelled(id, &outcome.text);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{RecordingObserver, Rendered, ScriptedGateway};
    use campus_chat_domain::RenderMode;

    fn setup() -> (Arc<Mutex<Transcript>>, MessageId) {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        let id = transcript.push_assistant(RenderMode::Markdown);
        (Arc::new(Mutex::new(transcript)), id)
    }

    async fn wait_for_text(transcript: &Mutex<Transcript>, id: MessageId, expected: &str) {
        loop {
            let seen = transcript
                .lock()
                .unwrap()
                .get(id)
                .is_some_and(|m| m.text == expected);
            if seen {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    async fn run_chunks(chunks: Vec<&[u8]>) -> (StreamOutcome, RecordingObserver, Arc<Mutex<Transcript>>, MessageId) {
        let gateway = ScriptedGateway::new();
        gateway.push_chunks(chunks);
        let (transcript, id) = setup();
        let observer = RecordingObserver::default();
        let outcome = StreamSession::new(Arc::new(gateway), transcript.clone(), id)
            .run("hi", &observer)
            .await
            .unwrap();
        (outcome, observer, transcript, id)
    }

    #[tokio::test]
    async fn test_accumulates_tokens_and_renders_full_text() {
        let (outcome, observer, transcript, id) =
            run_chunks(vec![b"data: a\n", b"data: b\nevent: done\n"]).await;

        assert_eq!(outcome.text, "ab");
        assert!(outcome.completed);
        assert!(!outcome.server_error);
        assert_eq!(
            observer.events(),
            vec![
                Rendered::Open(id),
                Rendered::Token(id, "a".into()),
                Rendered::Token(id, "ab".into()),
                Rendered::Complete(id, "ab".into()),
            ]
        );

        let transcript = transcript.lock().unwrap();
        let record = transcript.get(id).unwrap();
        assert_eq!(record.text, "ab");
        assert_eq!(record.state, MessageState::Complete);
    }

    #[tokio::test]
    async fn test_empty_stream_renders_placeholder() {
        let (outcome, observer, transcript, id) = run_chunks(vec![]).await;

        assert_eq!(outcome.text, "");
        assert_eq!(outcome.label(), "empty");
        assert_eq!(observer.events(), vec![Rendered::Open(id), Rendered::Empty(id)]);
        assert_eq!(
            transcript.lock().unwrap().get(id).unwrap().state,
            MessageState::Empty
        );
    }

    #[tokio::test]
    async fn test_truncated_tail_is_dropped() {
        let (outcome, observer, _, id) = run_chunks(vec![b"data: x"]).await;

        assert_eq!(outcome.text, "");
        assert_eq!(outcome.truncated.as_deref(), Some("data: x"));
        assert_eq!(observer.events(), vec![Rendered::Open(id), Rendered::Empty(id)]);
    }

    #[tokio::test]
    async fn test_error_event_is_informational() {
        let (outcome, _, _, _) = run_chunks(vec![
            b"data: partial\n\n",
            b"event: error\ndata: model crashed\n\n",
            b"data: more\n\n",
        ])
        .await;

        assert!(outcome.server_error);
        assert_eq!(outcome.server_message.as_deref(), Some("model crashed"));
        assert_eq!(outcome.text, "partialmore");
    }

    #[tokio::test]
    async fn test_tokens_after_events_without_blank_lines_are_kept() {
        let (outcome, _, _, _) = run_chunks(vec![
            b"data: a\nevent: error\ndata: oops\ndata: b\n",
            b"event: ping\ndata: c\n",
        ])
        .await;

        assert!(outcome.server_error);
        assert_eq!(outcome.server_message.as_deref(), Some("oops"));
        assert_eq!(outcome.text, "abc");
    }

    #[tokio::test]
    async fn test_start_and_done_payloads_are_not_tokens() {
        let (outcome, _, _, _) = run_chunks(vec![
            b"event: start\ndata: Generation started\n\n",
            b"data: Hello\\nthere\n\n",
            b"event: done\ndata: {\"token_count\": 2, \"generation_time\": 0.25}\n\n",
        ])
        .await;

        assert_eq!(outcome.text, "Hello\nthere");
        assert_eq!(
            outcome.stats,
            Some(GenerationStats {
                token_count: 2,
                generation_time: 0.25
            })
        );
    }

    #[tokio::test]
    async fn test_refused_request_is_a_transport_error() {
        let gateway = ScriptedGateway::new();
        gateway.push_failure(TransportError::Status {
            code: 503,
            reason: "Service Unavailable".into(),
        });
        let (transcript, id) = setup();
        let observer = RecordingObserver::default();

        let err = StreamSession::new(Arc::new(gateway), transcript, id)
            .run("hi", &observer)
            .await
            .unwrap_err();

        assert!(matches!(err, StreamError::Transport(TransportError::Status { code: 503, .. })));
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_keeps_partial_text() {
        let gateway = ScriptedGateway::new();
        gateway.push_results(vec![
            Ok(b"data: half an ans\n".to_vec()),
            Err(TransportError::Read("connection reset".into())),
        ]);
        let (transcript, id) = setup();

        let err = StreamSession::new(Arc::new(gateway), transcript.clone(), id)
            .run("hi", &RecordingObserver::default())
            .await
            .unwrap_err();

        assert_eq!(err.partial_text(), "half an ans");
        assert_eq!(
            transcript.lock().unwrap().get(id).unwrap().text,
            "half an ans"
        );
    }

    #[tokio::test]
    async fn test_cleared_transcript_turns_renders_into_no_ops() {
        let gateway = ScriptedGateway::new();
        let sender = gateway.push_channel();
        let (transcript, id) = setup();
        let observer = RecordingObserver::default();

        let session = StreamSession::new(Arc::new(gateway), transcript.clone(), id);
        let driver = async {
            sender.send(Ok(b"data: one\n".to_vec())).await.unwrap();
            wait_for_text(&transcript, id, "one").await;
            transcript.lock().unwrap().clear();
            sender.send(Ok(b"data: two\n".to_vec())).await.unwrap();
            drop(sender);
        };

        let (outcome, _) = tokio::join!(session.run("hi", &observer), driver);
        let outcome = outcome.unwrap();

        assert_eq!(outcome.text, "onetwo");
        assert!(outcome.detached);
        assert!(observer.events().contains(&Rendered::Token(id, "one".into())));
        assert!(
            !observer
                .events()
                .iter()
                .any(|e| matches!(e, Rendered::Token(_, t) if t == "onetwo"))
        );
        assert!(!observer.events().iter().any(|e| matches!(e, Rendered::Complete(..))));
        assert!(transcript.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_keeps_text_and_releases_body() {
        let gateway = ScriptedGateway::new();
        let sender = gateway.push_channel();
        let (transcript, id) = setup();
        let observer = RecordingObserver::default();
        let token = CancellationToken::new();

        let session = StreamSession::new(Arc::new(gateway), transcript.clone(), id)
            .with_cancellation(token.clone());
        let driver = async {
            sender.send(Ok(b"data: so far\n".to_vec())).await.unwrap();
            wait_for_text(&transcript, id, "so far").await;
            token.cancel();
        };

        let (outcome, _) = tokio::join!(session.run("hi", &observer), driver);
        let outcome = outcome.unwrap();

        assert!(outcome.cancelled);
        assert_eq!(outcome.text, "so far");
        assert!(observer.events().contains(&Rendered::Cancelled(id, "so far".into())));
        assert_eq!(
            transcript.lock().unwrap().get(id).unwrap().state,
            MessageState::Cancelled
        );
        // Body dropped: the sender sees a closed channel
        assert!(sender.is_closed());
    }

    #[tokio::test]
    async fn test_invalid_prompt_never_reaches_gateway() {
        let gateway = Arc::new(ScriptedGateway::new());
        let (transcript, id) = setup();

        let err = StreamSession::new(gateway.clone(), transcript, id)
            .run("   ", &RecordingObserver::default())
            .await
            .unwrap_err();

        assert!(matches!(err, StreamError::InvalidRequest(_)));
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_configured_params() {
        let gateway = Arc::new(ScriptedGateway::new());
        gateway.push_chunks(vec![]);
        let (transcript, id) = setup();
        let params = GenerationParams::default().with_max_tokens(64).with_temperature(0.1);

        StreamSession::new(gateway.clone(), transcript, id)
            .with_params(params)
            .run("  question  ", &RecordingObserver::default())
            .await
            .unwrap();

        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].prompt, "question");
        assert_eq!(requests[0].max_tokens, 64);
        assert_eq!(requests[0].temperature, 0.1);
    }
}
