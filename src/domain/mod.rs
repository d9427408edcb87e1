//! Domain types for recap.
//!
//! This module contains the core data structures:
//! - Transcript: Raw meeting text read from disk
//! - ExtractionResult: Structured fields parsed from the model's reply
//! - BatchReport: Per-file outcomes of one batch run

pub mod extraction;
pub mod report;
pub mod transcript;

// Re-export commonly used types
pub use extraction::{ActionItem, ExtractionResult};
pub use report::{BatchReport, FileOutcome, OutcomeStatus, Stage};
pub use transcript::Transcript;
