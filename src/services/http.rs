//! HTTP backend for the serving endpoint
//!
//! Speaks the submission contract: `POST /api/chat-stream` with a JSON body
//! carrying the single `message` field, reply streamed back as
//! newline-delimited records over a chunked body. The non-streamed variant
//! lives at `POST /api/chat`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, RillError};

use super::{ByteStream, ChatBackend};

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    content: String,
}

/// reqwest-backed [`ChatBackend`]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
    /// Whole-request bound for the non-streamed call; streamed replies are
    /// bounded per chunk by the orchestrator's idle timeout instead
    request_timeout: Duration,
}

impl HttpChatBackend {
    /// Build a backend from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn new(config: &Config) -> Result<Self> {
        Self::build(config.endpoint_base_url(), config.request_timeout())
    }

    /// Build a backend against an explicit base URL (tests, one-offs)
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), Duration::from_secs(120))
    }

    fn build(base_url: String, request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .timeout(self.request_timeout)
            .json(&ChatRequest { message })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(RillError::Endpoint { status, message });
        }

        let reply: ChatReply = response.json().await?;
        Ok(reply.content)
    }

    async fn open_reply_stream(&self, message: &str) -> Result<ByteStream> {
        debug!(url = %self.url("/api/chat-stream"), "opening reply stream");
        let response = self
            .client
            .post(self.url("/api/chat-stream"))
            .json(&ChatRequest { message })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(RillError::Endpoint { status, message });
        }

        Ok(Box::pin(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::services::streaming::{ResponseSink, FALLBACK_ERROR_REPLY};
    use crate::services::stream_reply;

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingSink {
        reasoning: Vec<String>,
        content: Vec<String>,
        completions: usize,
    }

    impl ResponseSink for RecordingSink {
        fn on_reasoning_delta(&mut self, text: &str) {
            self.reasoning.push(text.to_string());
        }

        fn on_content_delta(&mut self, text: &str) {
            self.content.push(text.to_string());
        }

        fn on_complete(&mut self) {
            self.completions += 1;
        }
    }

    #[tokio::test]
    async fn test_complete_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(serde_json::json!({ "message": "hi" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "content": "hello there" })),
            )
            .mount(&server)
            .await;

        let backend = HttpChatBackend::with_base_url(server.uri()).unwrap();
        assert_eq!(backend.complete("hi").await.unwrap(), "hello there");
    }

    #[tokio::test]
    async fn test_complete_surfaces_endpoint_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let backend = HttpChatBackend::with_base_url(server.uri()).unwrap();
        let err = backend.complete("hi").await.unwrap_err();
        assert!(matches!(err, RillError::Endpoint { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_open_reply_stream_yields_body_bytes() {
        let body = "{\"type\":\"content\",\"value\":\"hi\"}\n";
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let backend = HttpChatBackend::with_base_url(server.uri()).unwrap();
        let mut stream = backend.open_reply_stream("hi").await.unwrap();

        let mut collected = Vec::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, body.as_bytes());
    }

    #[tokio::test]
    async fn test_stream_reply_happy_path() {
        let body = "{\"type\":\"reasoning\",\"value\":\"think\"}\n\
                    not a record\n\
                    {\"type\":\"content\",\"value\":\"an\"}\n\
                    {\"type\":\"content\",\"value\":\"swer\"}\n";
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat-stream"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let backend = HttpChatBackend::with_base_url(server.uri()).unwrap();
        let mut sink = RecordingSink::default();
        stream_reply(&backend, "hi", Duration::from_secs(5), &mut sink).await;

        assert_eq!(sink.reasoning, vec!["think"]);
        // Buffered until end-of-stream, then flushed as one delta.
        assert_eq!(sink.content, vec!["answer"]);
        assert_eq!(sink.completions, 1);
    }

    #[tokio::test]
    async fn test_stream_reply_non_success_status_synthesizes_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat-stream"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let backend = HttpChatBackend::with_base_url(server.uri()).unwrap();
        let mut sink = RecordingSink::default();
        stream_reply(&backend, "hi", Duration::from_secs(5), &mut sink).await;

        assert_eq!(sink.content, vec![FALLBACK_ERROR_REPLY]);
        assert_eq!(sink.completions, 1);
    }

    #[tokio::test]
    async fn test_stream_reply_unreachable_endpoint_synthesizes_fallback() {
        // Nothing listens here; connection fails outright.
        let backend = HttpChatBackend::with_base_url("http://127.0.0.1:9").unwrap();
        let mut sink = RecordingSink::default();
        stream_reply(&backend, "hi", Duration::from_secs(5), &mut sink).await;

        assert_eq!(sink.content, vec![FALLBACK_ERROR_REPLY]);
        assert_eq!(sink.completions, 1);
    }
}
