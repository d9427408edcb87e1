//! Subprocess backend.
//!
//! Spawns a model CLI (default `ollama run <model>`), pipes the prompt to its
//! stdin and collects stdout as the reply.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::{BackendError, ExtractionBackend};

/// Backend that shells out to a model CLI
pub struct CommandBackend {
    /// Executable to run (e.g. "ollama")
    program: String,

    /// Arguments passed before the prompt is piped in
    args: Vec<String>,

    /// Optional bound on a single call
    timeout: Option<Duration>,
}

impl CommandBackend {
    /// Create a backend for a program and its arguments
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    /// Create a backend from a full command line (`["ollama", "run", "mistral"]`)
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    /// Bound each call; the child is killed when the bound expires
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn run(&self, prompt: &str) -> Result<String, BackendError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BackendError::Spawn {
                command: self.display_command(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BackendError::InvalidEnvelope("child stdin unavailable".to_string()))?;

        // Feed stdin while draining stdout so large prompts cannot deadlock
        let feed = async move {
            stdin.write_all(prompt.as_bytes()).await?;
            stdin.shutdown().await
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::CommandFailed {
                command: self.display_command(),
                code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }
        fed?;

        String::from_utf8(output.stdout).map_err(|_| BackendError::NonUtf8Output)
    }
}

#[async_trait]
impl ExtractionBackend for CommandBackend {
    fn name(&self) -> &str {
        "command"
    }

    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        match self.timeout {
            Some(limit) => timeout(limit, self.run(prompt))
                .await
                .map_err(|_| BackendError::TimedOut(limit))?,
            None => self.run(prompt).await,
        }
    }
}
