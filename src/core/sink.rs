//! Result sink: writes extraction results as CSV tables.
//!
//! Each transcript gets its own pair of tables, `<stem>_actions.csv` and
//! `<stem>_decisions.csv`, so results from one batch never overwrite each
//! other.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::ExtractionResult;

pub const ACTIONS_HEADER: [&str; 3] = ["owner", "task", "deadline"];
pub const DECISIONS_HEADER: [&str; 1] = ["Decision"];

/// A table could not be written
#[derive(Debug, Error)]
#[error("failed to write {}: {source}", path.display())]
pub struct SinkError {
    pub path: PathBuf,
    #[source]
    pub source: csv::Error,
}

/// Where a transcript's tables go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub actions: PathBuf,
    pub decisions: PathBuf,
}

impl OutputPaths {
    /// Output paths for a transcript stem inside `output_dir`
    pub fn for_transcript(output_dir: &Path, stem: &str) -> Self {
        Self {
            actions: output_dir.join(format!("{}_actions.csv", stem)),
            decisions: output_dir.join(format!("{}_decisions.csv", stem)),
        }
    }
}

/// Write decisions and action items to their tables.
///
/// Both files are created or overwritten, headers included even when there
/// are no rows. Parent directories are created as needed.
pub fn write(
    result: &ExtractionResult,
    decisions_path: &Path,
    actions_path: &Path,
) -> Result<(), SinkError> {
    write_table(
        actions_path,
        &ACTIONS_HEADER,
        result
            .action_items
            .iter()
            .map(|item| vec![item.owner.as_str(), item.task.as_str(), item.deadline.as_str()]),
    )?;

    write_table(
        decisions_path,
        &DECISIONS_HEADER,
        result.decisions.iter().map(|d| vec![d.as_str()]),
    )
}

fn write_table<'a, I>(path: &Path, header: &[&str], rows: I) -> Result<(), SinkError>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let wrap = |source: csv::Error| SinkError {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| wrap(e.into()))?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
    writer.write_record(header).map_err(wrap)?;
    for row in rows {
        writer.write_record(&row).map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(e.into()))?;

    Ok(())
}
