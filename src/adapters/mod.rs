//! Extraction backends.
//!
//! A backend is a black-box text-completion service: it receives one prompt
//! and returns the model's raw reply. Two implementations exist:
//! - `OllamaBackend`: HTTP chat endpoint of a local or remote Ollama server
//! - `CommandBackend`: any CLI that reads a prompt on stdin (e.g. `ollama run`)

pub mod command;
pub mod ollama;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::{BackendConfig, BackendKind};

pub use command::CommandBackend;
pub use ollama::OllamaBackend;

/// Errors surfaced by an extraction backend.
///
/// All of these are fatal for the transcript being processed and never
/// retried.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot connect to {url}; is the model server running?")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected backend response: {0}")]
    InvalidEnvelope(String),

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("backend output is not valid UTF-8")]
    NonUtf8Output,

    #[error("backend call timed out after {0:?}")]
    TimedOut(Duration),

    #[error("I/O error talking to backend: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for text-completion backends
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Send a prompt and return the raw reply, unmodified
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Build the backend selected by configuration
pub fn from_config(config: &BackendConfig) -> Result<Box<dyn ExtractionBackend>> {
    let timeout = config.timeout_seconds.map(Duration::from_secs);

    match config.kind {
        BackendKind::Http => {
            let mut backend = OllamaBackend::new(config.url.clone(), config.model.clone());
            if let Some(timeout) = timeout {
                backend = backend.with_timeout(timeout);
            }
            Ok(Box::new(backend))
        }
        BackendKind::Command => {
            let command = config.command_line();
            let mut backend = CommandBackend::from_command_line(&command)
                .ok_or_else(|| anyhow::anyhow!("backend.command must not be empty"))?;
            if let Some(timeout) = timeout {
                backend = backend.with_timeout(timeout);
            }
            Ok(Box::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_backend() {
        let http = BackendConfig::default();
        assert_eq!(from_config(&http).unwrap().name(), "ollama");

        let command = BackendConfig {
            kind: BackendKind::Command,
            ..Default::default()
        };
        assert_eq!(from_config(&command).unwrap().name(), "command");
    }

    #[test]
    fn test_empty_command_rejected() {
        let config = BackendConfig {
            kind: BackendKind::Command,
            command: Some(Vec::new()),
            ..Default::default()
        };
        assert!(from_config(&config).is_err());
    }
}
