//! Ollama HTTP backend.
//!
//! Sends the prompt as a single user message to `POST {url}/api/chat` with
//! streaming disabled and returns `message.content` untouched.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{BackendError, ExtractionBackend};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "mistral";

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Backend talking to an Ollama server
pub struct OllamaBackend {
    /// Server base URL (e.g. http://localhost:11434)
    base_url: String,

    /// Model name (e.g. "mistral", "llama3")
    model: String,

    /// Optional bound on a single request
    timeout: Option<Duration>,

    client: reqwest::Client,
}

impl OllamaBackend {
    /// Create a backend for a server and model
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Bound each request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    fn classify(&self, url: &str, error: reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::TimedOut(self.timeout.unwrap_or_default())
        } else if error.is_connect() {
            BackendError::Unreachable {
                url: url.to_string(),
                source: error,
            }
        } else {
            BackendError::Request {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

#[async_trait]
impl ExtractionBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        let url = self.chat_url();

        let mut request = self.client.post(&url).json(&serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "stream": false
        }));
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| self.classify(&url, e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(&url, e))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidEnvelope(format!("{}: {}", e, body)))?;

        Ok(chat.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let backend = OllamaBackend::new("http://localhost:11434/", "mistral");
        assert_eq!(backend.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(backend.model(), "mistral");
    }

    #[tokio::test]
    async fn test_complete_returns_message_content() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "mistral",
                "stream": false,
                "messages": [{"role": "user", "content": "extract this"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"model":"mistral","message":{"role":"assistant","content":" {\"decisions\": []}\n"},"done":true}"#)
            .create_async()
            .await;

        let backend = OllamaBackend::new(server.url(), "mistral");
        let reply = backend.complete("extract this").await.unwrap();

        // Reply is passed through without trimming
        assert_eq!(reply, " {\"decisions\": []}\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(404)
            .with_body(r#"{"error":"model 'mistral' not found"}"#)
            .create_async()
            .await;

        let backend = OllamaBackend::new(server.url(), "mistral");
        match backend.complete("prompt").await {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, 404);
                assert!(body.contains("not found"));
            }
            other => panic!("expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_envelope() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_body("<html>proxy error</html>")
            .create_async()
            .await;

        let backend = OllamaBackend::new(server.url(), "mistral");
        assert!(matches!(
            backend.complete("prompt").await,
            Err(BackendError::InvalidEnvelope(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let backend = OllamaBackend::new("http://127.0.0.1:1", "mistral");
        assert!(matches!(
            backend.complete("prompt").await,
            Err(BackendError::Unreachable { .. })
        ));
    }
}
