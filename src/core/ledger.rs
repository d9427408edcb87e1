//! Append-only ledger of fully processed transcript names.
//!
//! Stored as plain text, one file name per line. A name is appended only
//! after its transcript's pipeline succeeded, and each append is flushed and
//! synced before returning, so a crash leaves the ledger listing exactly the
//! files completed so far.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// File-based processed-files ledger
pub struct ProcessedLedger {
    path: PathBuf,
}

impl ProcessedLedger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path to the ledger file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `name` can be stored as a single ledger line
    pub fn accepts(name: &str) -> bool {
        !name.is_empty() && !name.contains(['\n', '\r'])
    }

    /// Load every recorded name. A missing ledger is an empty one.
    pub async fn load(&self) -> Result<HashSet<String>> {
        let mut names = HashSet::new();

        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(names),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to open ledger: {}", self.path.display()))
            }
        };

        let mut lines = BufReader::new(file).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("Failed to read ledger: {}", self.path.display()))?
        {
            if !line.is_empty() {
                names.insert(line);
            }
        }

        Ok(names)
    }

    /// Durably record a processed file name
    pub async fn append(&self, name: &str) -> Result<()> {
        if !Self::accepts(name) {
            anyhow::bail!("Cannot record {:?} in ledger: name must be a single non-empty line", name);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create ledger directory: {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open ledger: {}", self.path.display()))?;

        file.write_all(format!("{}\n", name).as_bytes())
            .await
            .context("Failed to append to ledger")?;
        file.flush().await.context("Failed to flush ledger")?;
        file.sync_data().await.context("Failed to sync ledger")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_ledger() -> (ProcessedLedger, TempDir) {
        let temp = TempDir::new().unwrap();
        let ledger = ProcessedLedger::new(temp.path().join("out").join("processed.ledger"));
        (ledger, temp)
    }

    #[tokio::test]
    async fn test_missing_ledger_is_empty() {
        let (ledger, _temp) = create_test_ledger();
        assert!(ledger.load().await.unwrap().is_empty());
        assert!(!ledger.path().exists());
    }

    #[tokio::test]
    async fn test_append_and_load() {
        let (ledger, _temp) = create_test_ledger();

        ledger.append("a.txt").await.unwrap();
        ledger.append("b c.txt").await.unwrap();

        let names = ledger.load().await.unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.txt"));
        assert!(names.contains("b c.txt"));

        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(content, "a.txt\nb c.txt\n");
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let (ledger, _temp) = create_test_ledger();
        ledger.append("first.txt").await.unwrap();

        let reopened = ProcessedLedger::new(ledger.path().to_path_buf());
        reopened.append("second.txt").await.unwrap();

        let names = ledger.load().await.unwrap();
        assert!(names.contains("first.txt"));
        assert!(names.contains("second.txt"));
    }

    #[tokio::test]
    async fn test_blank_lines_and_crlf_ignored() {
        let (ledger, _temp) = create_test_ledger();
        std::fs::create_dir_all(ledger.path().parent().unwrap()).unwrap();
        std::fs::write(ledger.path(), "a.txt\r\n\nb.txt\n").unwrap();

        let names = ledger.load().await.unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("a.txt"));
        assert!(names.contains("b.txt"));
    }

    #[tokio::test]
    async fn test_rejects_multiline_names() {
        let (ledger, _temp) = create_test_ledger();
        assert!(ledger.append("evil\nname.txt").await.is_err());
        assert!(ledger.append("").await.is_err());
        assert!(ledger.load().await.unwrap().is_empty());
    }

    #[test]
    fn test_accepts_single_line_names() {
        assert!(ProcessedLedger::accepts("weekly sync.txt"));
        assert!(!ProcessedLedger::accepts("a\nb.txt"));
        assert!(!ProcessedLedger::accepts("a\rb.txt"));
        assert!(!ProcessedLedger::accepts(""));
    }

    #[tokio::test]
    async fn test_unreachable_ledger_is_an_error() {
        let temp = TempDir::new().unwrap();
        // Parent of the ledger path is a regular file
        let blocker = temp.path().join("out");
        std::fs::write(&blocker, "not a directory").unwrap();
        let ledger = ProcessedLedger::new(blocker.join("processed.ledger"));

        assert!(ledger.load().await.is_err());
    }
}
