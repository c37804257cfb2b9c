//! Scripted gateway and recording observer shared by use case tests.

use crate::ports::chat_gateway::{ChatGateway, ResponseBody, TransportError};
use crate::ports::stream_observer::StreamObserver;
use async_trait::async_trait;
use campus_chat_domain::{ChatRequest, HealthReport, MessageId, ServerStatus};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc;

type Chunk = Result<Vec<u8>, TransportError>;

enum Script {
    Chunks(Vec<Chunk>),
    Channel(mpsc::Receiver<Chunk>),
    Fail(TransportError),
}

/// Gateway answering each `open_stream` call with the next queued script.
#[derive(Default)]
pub struct ScriptedGateway {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ChatRequest>>,
    statuses: Mutex<VecDeque<Result<ServerStatus, TransportError>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_chunks(&self, chunks: Vec<&[u8]>) {
        self.push_results(chunks.into_iter().map(|c| Ok(c.to_vec())).collect());
    }

    pub fn push_results(&self, chunks: Vec<Chunk>) {
        self.scripts.lock().unwrap().push_back(Script::Chunks(chunks));
    }

    pub fn push_failure(&self, error: TransportError) {
        self.scripts.lock().unwrap().push_back(Script::Fail(error));
    }

    /// Queue a body fed by hand; it stays open until the sender is dropped.
    pub fn push_channel(&self) -> mpsc::Sender<Chunk> {
        let (tx, rx) = mpsc::channel(16);
        self.scripts.lock().unwrap().push_back(Script::Channel(rx));
        tx
    }

    pub fn push_status(&self, status: Result<ServerStatus, TransportError>) {
        self.statuses.lock().unwrap().push_back(status);
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ResponseBody, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self.scripts.lock().unwrap().pop_front();
        match script {
            Some(Script::Chunks(chunks)) => Ok(ResponseBody::from_stream(futures::stream::iter(chunks))),
            Some(Script::Channel(rx)) => Ok(ResponseBody::from_stream(futures::stream::unfold(
                rx,
                |mut rx| async move { rx.recv().await.map(|chunk| (chunk, rx)) },
            ))),
            Some(Script::Fail(error)) => Err(error),
            None => Err(TransportError::Connect("no scripted response".to_string())),
        }
    }

    async fn server_status(&self) -> Result<ServerStatus, TransportError> {
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connect("no scripted status".to_string())))
    }

    async fn health(&self) -> Result<HealthReport, TransportError> {
        Ok(HealthReport {
            status: "healthy".to_string(),
            model_loaded: true,
        })
    }
}

/// What an observer was asked to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Start(MessageId),
    Open(MessageId),
    Token(MessageId, String),
    Complete(MessageId, String),
    Empty(MessageId),
    Cancelled(MessageId, String),
    ServerError(MessageId, Option<String>),
    Error(MessageId, String),
    End(MessageId),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Rendered>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: Rendered) {
        self.events.lock().unwrap().push(event);
    }
}

impl StreamObserver for RecordingObserver {
    fn on_generation_start(&self, id: MessageId) {
        self.record(Rendered::Start(id));
    }

    fn on_stream_open(&self, id: MessageId) {
        self.record(Rendered::Open(id));
    }

    fn on_token(&self, id: MessageId, text: &str) {
        self.record(Rendered::Token(id, text.to_string()));
    }

    fn on_complete(&self, id: MessageId, text: &str) {
        self.record(Rendered::Complete(id, text.to_string()));
    }

    fn on_empty(&self, id: MessageId) {
        self.record(Rendered::Empty(id));
    }

    fn on_cancelled(&self, id: MessageId, text: &str) {
        self.record(Rendered::Cancelled(id, text.to_string()));
    }

    fn on_server_error(&self, id: MessageId, message: Option<&str>) {
        self.record(Rendered::ServerError(id, message.map(str::to_string)));
    }

    fn on_error(&self, id: MessageId, message: &str) {
        self.record(Rendered::Error(id, message.to_string()));
    }

    fn on_generation_end(&self, id: MessageId) {
        self.record(Rendered::End(id));
    }
}
