//! recap - Idempotent meeting-transcript extraction
//!
//! Reads free-text meeting transcripts, asks a language model to extract
//! participants, decisions and action items, and writes the results as CSV
//! tables.
//!
//! # Architecture
//!
//! Each transcript goes through a four-stage pipeline:
//! read → extract → parse → write. A batch orchestrator runs the pipeline
//! over a directory, one file at a time, and keeps a durable ledger of
//! completed file names:
//! - A file in the ledger is never processed again
//! - A failed file stays out of the ledger and is retried on the next batch
//! - A crash mid-batch loses at most the file in flight
//!
//! # Modules
//!
//! - `adapters`: Extraction backends (Ollama HTTP, model CLI)
//! - `core`: Pipeline stages, ledger and orchestrator
//! - `domain`: Data structures (Transcript, ExtractionResult, BatchReport)
//! - `config`: Layered configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Process ./transcripts
//! recap
//!
//! # Process another directory
//! recap meetings/2024-q1
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{BackendError, ExtractionBackend};
pub use config::Config;
pub use crate::core::{BatchOrchestrator, PipelineError, TranscriptPipeline};
pub use domain::{ActionItem, BatchReport, ExtractionResult, OutcomeStatus, Stage, Transcript};
