//! Transcript discovery and loading.

use std::io;
use std::path::Path;

use tokio::fs;
use tracing::warn;

use crate::domain::Transcript;

/// Extension that marks a file as a transcript
pub const TRANSCRIPT_EXTENSION: &str = ".txt";

/// List transcript file names in `dir`, sorted lexicographically.
///
/// Only regular files whose name ends with `.txt` are returned. Directories
/// and names that are not valid UTF-8 are ignored. An entry whose metadata
/// cannot be read is still listed, so reading it fails for that file alone.
pub async fn list_transcripts(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.ends_with(TRANSCRIPT_EXTENSION) {
            continue;
        }
        // Follows symlinks so a linked transcript still counts
        match fs::metadata(entry.path()).await {
            Ok(meta) if !meta.is_file() => continue,
            Ok(_) => names.push(name),
            Err(e) => {
                warn!(file = %name, error = %e, "Cannot inspect transcript entry");
                names.push(name);
            }
        }
    }

    names.sort();
    Ok(names)
}

/// Read a transcript's full text, line endings preserved
pub async fn read(path: &Path) -> io::Result<Transcript> {
    let text = fs::read_to_string(path).await?;
    Ok(Transcript::new(path, text))
}
