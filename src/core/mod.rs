//! Core batch logic.
//!
//! This module contains:
//! - Source: Transcript discovery and reading
//! - Extractor: Prompt construction and backend calls
//! - Parser: Reply validation
//! - Sink: CSV output tables
//! - Pipeline: The four stages for one transcript
//! - Ledger: Durable record of processed files
//! - Orchestrator: Batch execution engine

pub mod extractor;
pub mod ledger;
pub mod orchestrator;
pub mod parser;
pub mod pipeline;
pub mod sink;
pub mod source;

// Re-export commonly used types
pub use extractor::{build_prompt, ExtractionClient};
pub use ledger::ProcessedLedger;
pub use orchestrator::BatchOrchestrator;
pub use parser::{parse, MalformedResponse};
pub use pipeline::{PipelineError, PipelineOutput, TranscriptPipeline};
pub use sink::{OutputPaths, SinkError};
