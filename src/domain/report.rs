//! Per-file outcomes of one batch run.
//!
//! The report is ephemeral: it is rebuilt on every invocation and never
//! persisted. The ledger, not the report, decides what gets reprocessed.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stage a transcript failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Reading the transcript file
    Read,

    /// Calling the extraction backend
    Extract,

    /// Parsing the model's reply
    Parse,

    /// Writing the output tables
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Read => write!(f, "read"),
            Stage::Extract => write!(f, "extract"),
            Stage::Parse => write!(f, "parse"),
            Stage::Write => write!(f, "write"),
        }
    }
}

/// What happened to one discovered transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum OutcomeStatus {
    /// Pipeline succeeded and the file was appended to the ledger
    Processed {
        actions: PathBuf,
        decisions: PathBuf,
        action_count: usize,
        decision_count: usize,
    },

    /// Already in the ledger when the batch started
    Skipped,

    /// Pipeline failed; the file stays out of the ledger
    Failed { stage: Stage, error: String },
}

/// Outcome for a single transcript file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub file_name: String,
    pub status: OutcomeStatus,
}

/// Summary of one batch invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique identifier for this batch (log correlation only)
    pub batch_id: Uuid,

    /// Directory that was scanned
    pub directory: PathBuf,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// One entry per discovered file, in processing order
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Start an empty report for a directory
    pub fn new(directory: PathBuf) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            directory,
            started_at: Utc::now(),
            finished_at: None,
            outcomes: Vec::new(),
        }
    }

    /// Record an outcome
    pub fn record(&mut self, file_name: impl Into<String>, status: OutcomeStatus) {
        self.outcomes.push(FileOutcome {
            file_name: file_name.into(),
            status,
        });
    }

    /// Mark the batch as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn processed(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Processed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Failed { .. }))
    }

    /// True if any transcript failed in this run
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Look up the outcome for a file name
    pub fn outcome(&self, file_name: &str) -> Option<&OutcomeStatus> {
        self.outcomes
            .iter()
            .find(|o| o.file_name == file_name)
            .map(|o| &o.status)
    }

    fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&OutcomeStatus) -> bool,
    {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}
