//! A single meeting transcript as read from disk.

use std::path::{Path, PathBuf};

/// Raw text of one meeting, identified by its source filename.
///
/// Transcripts are read once per pipeline run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    /// File name only (the ledger key)
    pub name: String,

    /// Full path the text was read from
    pub path: PathBuf,

    /// File contents, line endings preserved
    pub text: String,
}

impl Transcript {
    /// Create a transcript from a path and its contents
    pub fn new(path: &Path, text: String) -> Self {
        Self {
            name: path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
            path: path.to_path_buf(),
            text,
        }
    }

    /// File name without the `.txt` extension, used to name output tables
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}
