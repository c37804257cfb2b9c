//! HTTP implementation of the chat gateway
//!
//! Talks to the inference server over plain HTTP: the chat endpoint returns a
//! streamed `text/event-stream` body which is handed to the application layer
//! chunk by chunk, undecoded. `/status` and `/health` are small JSON documents.

use super::error::{HttpError, status_error, transport_error};
use async_trait::async_trait;
use campus_chat_application::{ChatGateway, ResponseBody, TransportError};
use campus_chat_domain::{ChatRequest, HealthReport, ServerStatus};
use futures::StreamExt;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

/// Where the server lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEndpoint {
    pub base_url: String,
    pub stream_path: String,
    pub status_path: String,
    pub health_path: String,
    pub connect_timeout: Duration,
}

impl Default for ServerEndpoint {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            stream_path: "/api/chat/stream".to_string(),
            status_path: "/status".to_string(),
            health_path: "/health".to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ServerEndpoint {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, path: &str) -> Result<Url, HttpError> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| HttpError::InvalidUrl {
            url: joined,
            reason: e.to_string(),
        })
    }
}

/// Gateway backed by `reqwest`.
pub struct HttpChatGateway {
    client: Client,
    stream_url: Url,
    status_url: Url,
    health_url: Url,
    request_timeout: Duration,
}

impl HttpChatGateway {
    pub fn new(endpoint: &ServerEndpoint) -> Result<Self, HttpError> {
        let client = Client::builder()
            .connect_timeout(endpoint.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            stream_url: endpoint.url(&endpoint.stream_path)?,
            status_url: endpoint.url(&endpoint.status_path)?,
            health_url: endpoint.url(&endpoint.health_path)?,
            request_timeout: endpoint.connect_timeout,
        })
    }

    /// The chat endpoint URL.
    pub fn stream_url(&self) -> &Url {
        &self.stream_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, TransportError> {
        trace!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn open_stream(&self, request: &ChatRequest) -> Result<ResponseBody, TransportError> {
        debug!("POST {}", self.stream_url);
        let response = self
            .client
            .post(self.stream_url.clone())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!("Chat request refused: {}", status);
            return Err(status_error(status));
        }

        let chunks = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| TransportError::Read(e.to_string()))
        });

        Ok(ResponseBody::from_stream(chunks))
    }

    async fn server_status(&self) -> Result<ServerStatus, TransportError> {
        self.get_json(&self.status_url).await
    }

    async fn health(&self) -> Result<HealthReport, TransportError> {
        self.get_json(&self.health_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_chat_domain::GenerationParams;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> HttpChatGateway {
        HttpChatGateway::new(&ServerEndpoint::default().with_base_url(server.uri())).unwrap()
    }

    async fn collect(mut body: ResponseBody) -> Vec<u8> {
        let mut bytes = Vec::new();
        while let Some(chunk) = body.next_chunk().await {
            bytes.extend(chunk.unwrap());
        }
        bytes
    }

    #[test]
    fn test_urls_are_joined_without_double_slashes() {
        let endpoint = ServerEndpoint::default().with_base_url("http://campus.local:8000/");
        let gateway = HttpChatGateway::new(&endpoint).unwrap();
        assert_eq!(
            gateway.stream_url().as_str(),
            "http://campus.local:8000/api/chat/stream"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let endpoint = ServerEndpoint::default().with_base_url("not a url");
        assert!(matches!(
            HttpChatGateway::new(&endpoint),
            Err(HttpError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_stream_posts_request_and_yields_body() {
        let server = MockServer::start().await;
        let body = "event: start\ndata: Generation started\n\ndata: Hi\n\nevent: done\ndata: {}\n\n";

        Mock::given(method("POST"))
            .and(path("/api/chat/stream"))
            .and(body_json(json!({
                "prompt": "hello",
                "max_tokens": 512,
                "temperature": 0.7,
                "top_p": 0.9,
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = ChatRequest::new("hello", GenerationParams::default()).unwrap();
        let stream = gateway_for(&server).open_stream(&request).await.unwrap();

        assert_eq!(collect(stream).await, body.as_bytes());
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported_before_reading() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat/stream"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Server busy"))
            .mount(&server)
            .await;

        let request = ChatRequest::new("hello", GenerationParams::default()).unwrap();
        let err = match gateway_for(&server).open_stream(&request).await {
            Err(e) => e,
            Ok(_) => panic!("expected an error"),
        };

        assert_eq!(
            err,
            TransportError::Status {
                code: 503,
                reason: "Service Unavailable".into()
            }
        );
    }

    #[tokio::test]
    async fn test_status_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "running",
                "model": { "loaded": true, "model_path": "/models/tiny.gguf", "context_length": 2048 },
                "current_users": 1,
                "max_users": 3,
                "uptime": 42.5,
            })))
            .mount(&server)
            .await;

        let status = gateway_for(&server).server_status().await.unwrap();

        assert!(status.is_ready());
        assert_eq!(status.current_users, 1);
        assert_eq!(status.max_users, 3);
    }

    #[tokio::test]
    async fn test_garbage_status_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = gateway_for(&server).server_status().await.unwrap_err();

        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_health_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "healthy", "model_loaded": false })),
            )
            .mount(&server)
            .await;

        let health = gateway_for(&server).health().await.unwrap();

        assert!(health.is_healthy());
        assert!(!health.model_loaded);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_connect_error() {
        let endpoint = ServerEndpoint::default().with_base_url("http://127.0.0.1:9");
        let gateway = HttpChatGateway::new(&endpoint).unwrap();

        let err = gateway.server_status().await.unwrap_err();

        assert!(matches!(err, TransportError::Connect(_) | TransportError::Timeout));
    }
}
