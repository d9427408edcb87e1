//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use recap::{BackendError, Config, ExtractionBackend};
use tempfile::TempDir;

pub const DEFAULT_REPLY: &str = r#"{"participants": [], "decisions": [], "action_items": []}"#;

enum Reply {
    Text(String),
    Fail,
}

/// In-memory backend: picks a reply by looking for a marker in the prompt
#[derive(Clone, Default)]
pub struct StubBackend {
    rules: Arc<Vec<(String, Reply)>>,
    calls: Arc<AtomicUsize>,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `text` when the prompt contains `marker`
    pub fn reply(mut self, marker: &str, text: &str) -> Self {
        self.rules_mut()
            .push((marker.to_string(), Reply::Text(text.to_string())));
        self
    }

    /// Fail with a backend error when the prompt contains `marker`
    pub fn fail(mut self, marker: &str) -> Self {
        self.rules_mut().push((marker.to_string(), Reply::Fail));
        self
    }

    /// Number of completed or failed backend calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Boxed clone sharing the call counter
    pub fn boxed(&self) -> Box<dyn ExtractionBackend> {
        Box::new(self.clone())
    }

    fn rules_mut(&mut self) -> &mut Vec<(String, Reply)> {
        Arc::get_mut(&mut self.rules).expect("configure the stub before sharing it")
    }
}

#[async_trait]
impl ExtractionBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.rules.iter().find(|(marker, _)| prompt.contains(marker.as_str())) {
            Some((_, Reply::Text(text))) => Ok(text.clone()),
            Some((_, Reply::Fail)) => Err(BackendError::Status {
                status: 503,
                body: "model unavailable".to_string(),
            }),
            None => Ok(DEFAULT_REPLY.to_string()),
        }
    }
}

/// Temp workspace with `in/` and `out/` directories
pub struct Workspace {
    pub temp: TempDir,
    pub config: Config,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        let config = Config::with_dirs(input, temp.path().join("out"));
        Self { temp, config }
    }

    pub fn input_dir(&self) -> &Path {
        &self.config.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Write a transcript file into the input directory
    pub fn add_transcript(&self, name: &str, text: &str) -> PathBuf {
        let path = self.input_dir().join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    /// Ledger lines in file order
    pub fn ledger_lines(&self) -> Vec<String> {
        match std::fs::read_to_string(self.config.ledger_path()) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Seed the ledger as if an earlier run had completed these files
    pub fn seed_ledger(&self, names: &[&str]) {
        std::fs::create_dir_all(self.output_dir()).unwrap();
        let content: String = names.iter().map(|n| format!("{}\n", n)).collect();
        std::fs::write(self.config.ledger_path(), content).unwrap();
    }
}

/// Read a CSV file into rows of fields (header included)
pub fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
