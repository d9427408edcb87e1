//! Batch orchestrator.
//!
//! Discovers transcripts in a directory, skips the ones already recorded in
//! the ledger, runs the pipeline on the rest one at a time, and appends each
//! success to the ledger before moving on. A failing transcript is recorded
//! in the report and left out of the ledger so the next batch retries it.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info, instrument, warn};

use crate::adapters::{self, ExtractionBackend};
use crate::config::Config;
use crate::domain::{BatchReport, OutcomeStatus, Stage};

use super::ledger::ProcessedLedger;
use super::pipeline::TranscriptPipeline;
use super::source;

/// Main batch orchestrator
pub struct BatchOrchestrator {
    pipeline: TranscriptPipeline,

    /// Sole owner of ledger reads and appends
    ledger: ProcessedLedger,
}

impl BatchOrchestrator {
    /// Create an orchestrator writing outputs and the ledger under `config.output_dir`
    pub fn new(config: &Config, backend: Box<dyn ExtractionBackend>) -> Self {
        Self {
            pipeline: TranscriptPipeline::new(backend, config.output_dir.clone()),
            ledger: ProcessedLedger::new(config.ledger_path()),
        }
    }

    /// Create an orchestrator using the backend selected by configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = adapters::from_config(&config.backend)?;
        Ok(Self::new(config, backend))
    }

    pub fn ledger(&self) -> &ProcessedLedger {
        &self.ledger
    }

    /// Process every unprocessed transcript in `dir`.
    ///
    /// Per-transcript failures never abort the batch. Errors returned from
    /// here are batch-level: the ledger or the directory could not be read,
    /// or a success could not be recorded in the ledger.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn run(&self, dir: &Path) -> Result<BatchReport> {
        let mut report = BatchReport::new(dir.to_path_buf());
        info!(batch_id = %report.batch_id, "Starting batch");

        // Snapshot of the ledger at batch start
        let processed = self.ledger.load().await?;

        let candidates = source::list_transcripts(dir)
            .await
            .with_context(|| format!("Failed to list transcripts in {}", dir.display()))?;

        info!(
            discovered = candidates.len(),
            ledgered = processed.len(),
            "Discovered transcripts"
        );

        for name in candidates {
            if processed.contains(&name) {
                info!(file = %name, "Already processed, skipping");
                report.record(name, OutcomeStatus::Skipped);
                continue;
            }

            let status = self.process_file(dir, &name).await?;
            report.record(name, status);
        }

        report.finish();
        info!(
            processed = report.processed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Batch finished"
        );

        Ok(report)
    }

    /// Run the pipeline on one file and record a success in the ledger
    async fn process_file(&self, dir: &Path, name: &str) -> Result<OutcomeStatus> {
        let started = Instant::now();

        if !ProcessedLedger::accepts(name) {
            warn!(file = ?name, "File name cannot be recorded in the ledger");
            return Ok(OutcomeStatus::Failed {
                stage: Stage::Read,
                error: format!("file name {:?} cannot be recorded in the ledger", name),
            });
        }

        match self.pipeline.run(&dir.join(name)).await {
            Ok(output) => {
                self.ledger.append(name).await.with_context(|| {
                    format!("Processed {} but could not record it in the ledger", name)
                })?;

                info!(
                    file = %name,
                    duration_ms = started.elapsed().as_millis() as u64,
                    participants = output.result.participants.len(),
                    decisions = output.result.decisions.len(),
                    action_items = output.result.action_items.len(),
                    "Transcript processed"
                );

                Ok(OutcomeStatus::Processed {
                    action_count: output.result.action_items.len(),
                    decision_count: output.result.decisions.len(),
                    actions: output.outputs.actions,
                    decisions: output.outputs.decisions,
                })
            }
            Err(e) => {
                error!(file = %name, stage = %e.stage(), error = %e, "Transcript failed");

                Ok(OutcomeStatus::Failed {
                    stage: e.stage(),
                    error: e.to_string(),
                })
            }
        }
    }
}
