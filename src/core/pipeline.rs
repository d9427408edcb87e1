//! Transcript pipeline: read → extract → parse → write for one transcript.
//!
//! Stages run strictly in order. The first failing stage aborts the rest and
//! is reported as a single `PipelineError` tagged with that stage. There is no
//! retry here; the batch orchestrator decides what to do with failures.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::adapters::{BackendError, ExtractionBackend};
use crate::domain::{ExtractionResult, Stage};

use super::extractor::ExtractionClient;
use super::parser::{self, MalformedResponse};
use super::sink::{self, OutputPaths, SinkError};
use super::source;

/// A transcript's pipeline run failed
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read transcript {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("extraction failed: {0}")]
    ExtractionFailed(#[from] BackendError),

    #[error("parse failed: {0}")]
    ParseFailed(#[from] MalformedResponse),

    #[error("write failed: {0}")]
    WriteFailed(#[from] SinkError),
}

impl PipelineError {
    /// Stage the failure originated in
    pub fn stage(&self) -> Stage {
        match self {
            Self::ReadFailed { .. } => Stage::Read,
            Self::ExtractionFailed(_) => Stage::Extract,
            Self::ParseFailed(_) => Stage::Parse,
            Self::WriteFailed(_) => Stage::Write,
        }
    }
}

/// Result of a successful pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub result: ExtractionResult,
    pub outputs: OutputPaths,
}

/// Runs the four stages for a single transcript
pub struct TranscriptPipeline {
    client: ExtractionClient,

    /// Directory receiving the per-transcript tables
    output_dir: PathBuf,
}

impl TranscriptPipeline {
    pub fn new(backend: Box<dyn ExtractionBackend>, output_dir: PathBuf) -> Self {
        Self {
            client: ExtractionClient::new(backend),
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Process one transcript file. Succeeds fully or fails with the stage that broke.
    #[instrument(skip(self), fields(backend = self.client.backend_name()))]
    pub async fn run(&self, path: &Path) -> Result<PipelineOutput, PipelineError> {
        let transcript = source::read(path)
            .await
            .map_err(|source| PipelineError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;

        let raw = self.client.extract(&transcript.text).await?;

        let result = parser::parse(&raw).map_err(|e| {
            debug!(raw = %e.raw, "Unparseable model reply");
            e
        })?;

        let outputs = OutputPaths::for_transcript(&self.output_dir, &transcript.stem());
        sink::write(&result, &outputs.decisions, &outputs.actions)?;

        Ok(PipelineOutput { result, outputs })
    }
}
