//! Configuration for recap.
//!
//! Configuration sources (highest priority first):
//! 1. CLI positional directory / RECAP_INPUT_DIR (input directory only)
//! 2. Environment variables (RECAP_OUTPUT_DIR, RECAP_BACKEND, RECAP_OLLAMA_URL, RECAP_MODEL)
//! 3. Config file (.recap/config.yaml)
//! 4. Defaults (./transcripts in, ./output out, Ollama on localhost)
//!
//! Config file discovery:
//! - Searches current directory and parents for .recap/config.yaml
//! - Paths in config file are relative to the project root (parent of .recap/)
//!
//! The resolved `Config` is an ordinary value handed to the orchestrator;
//! nothing is cached globally.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::adapters::ollama::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};

pub const DEFAULT_INPUT_DIR: &str = "transcripts";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const LEDGER_FILE_NAME: &str = "processed.ledger";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub backend: Option<BackendFileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Transcript directory (relative to project root)
    pub input: Option<String>,
    /// Output and ledger directory (relative to project root)
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendFileConfig {
    pub kind: Option<BackendKind>,
    pub url: Option<String>,
    pub model: Option<String>,
    pub command: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
}

/// Which extraction backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Ollama HTTP chat API
    #[default]
    Http,

    /// Model CLI reading the prompt on stdin
    Command,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(BackendKind::Http),
            "command" => Ok(BackendKind::Command),
            _ => Err(format!("Unknown backend: {}. Use 'http' or 'command'", s)),
        }
    }
}

/// Resolved backend settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub url: String,
    pub model: String,
    /// Explicit command line; `None` means `ollama run <model>`
    pub command: Option<Vec<String>>,
    /// No timeout unless set
    pub timeout_seconds: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Http,
            url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            command: None,
            timeout_seconds: None,
        }
    }
}

impl BackendConfig {
    /// Command line for the subprocess backend
    pub fn command_line(&self) -> Vec<String> {
        self.command.clone().unwrap_or_else(|| {
            vec!["ollama".to_string(), "run".to_string(), self.model.clone()]
        })
    }
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for *.txt transcripts
    pub input_dir: PathBuf,
    /// Directory receiving output tables and the ledger
    pub output_dir: PathBuf,
    pub backend: BackendConfig,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            backend: BackendConfig::default(),
            config_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the discovered config file and process environment
    pub fn load() -> Result<Self> {
        let config_file = find_config_file();
        let parsed = match config_file {
            Some(ref path) => Some(load_config_file(path)?),
            None => None,
        };

        let mut config = resolve(parsed.as_ref(), config_file.as_deref(), |key| {
            std::env::var(key).ok()
        })?;
        config.config_file = config_file;
        Ok(config)
    }

    /// Config rooted at explicit directories, with default backend settings
    pub fn with_dirs(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// Path of the processed-files ledger
    pub fn ledger_path(&self) -> PathBuf {
        self.output_dir.join(LEDGER_FILE_NAME)
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".recap").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Merge file settings, environment and defaults
fn resolve<F>(file: Option<&ConfigFile>, file_path: Option<&Path>, env: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // Project root is the parent of .recap/
    let base_dir = file_path
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."));

    let paths = file.map(|f| f.paths.clone()).unwrap_or_default();
    let backend_file = file.and_then(|f| f.backend.clone()).unwrap_or_default();

    let input_dir = if let Some(dir) = env("RECAP_INPUT_DIR") {
        PathBuf::from(dir)
    } else if let Some(ref dir) = paths.input {
        resolve_path(base_dir, dir)
    } else {
        PathBuf::from(DEFAULT_INPUT_DIR)
    };

    let output_dir = if let Some(dir) = env("RECAP_OUTPUT_DIR") {
        PathBuf::from(dir)
    } else if let Some(ref dir) = paths.output {
        resolve_path(base_dir, dir)
    } else {
        PathBuf::from(DEFAULT_OUTPUT_DIR)
    };

    let kind = match env("RECAP_BACKEND") {
        Some(value) => value.parse::<BackendKind>().map_err(|e: String| anyhow::anyhow!(e))?,
        None => backend_file.kind.unwrap_or_default(),
    };

    let backend = BackendConfig {
        kind,
        url: env("RECAP_OLLAMA_URL")
            .or(backend_file.url)
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
        model: env("RECAP_MODEL")
            .or(backend_file.model)
            .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        command: backend_file.command,
        timeout_seconds: backend_file.timeout_seconds,
    };

    Ok(Config {
        input_dir,
        output_dir,
        backend,
        config_file: None,
    })
}
