//! Command-line interface for recap.
//!
//! `recap [DIR]` processes every transcript in `DIR` (default: the configured
//! input directory) that is not yet in the ledger, then prints a summary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::Config;
use crate::core::BatchOrchestrator;
use crate::domain::{BatchReport, OutcomeStatus};

/// recap - extract decisions and action items from meeting transcripts
#[derive(Parser, Debug)]
#[command(name = "recap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing *.txt transcripts (default: ./transcripts)
    pub dir: Option<PathBuf>,
}

impl Cli {
    /// Execute the batch
    pub async fn execute(self) -> Result<()> {
        let config = Config::load()?;
        let dir = self.dir.unwrap_or_else(|| config.input_dir.clone());

        let orchestrator = BatchOrchestrator::from_config(&config)?;
        let report = orchestrator.run(&dir).await?;

        print_report(&report);

        if report.has_failures() {
            std::process::exit(1);
        }

        Ok(())
    }
}

/// Print per-file outcomes and totals
fn print_report(report: &BatchReport) {
    if report.outcomes.is_empty() {
        println!("No transcripts found in {}", report.directory.display());
        return;
    }

    println!("{:<40} {:<10} {}", "FILE", "STATUS", "DETAIL");
    println!("{}", "-".repeat(80));

    for outcome in &report.outcomes {
        let (status, detail) = match &outcome.status {
            OutcomeStatus::Processed {
                actions,
                action_count,
                decision_count,
                ..
            } => (
                "processed".to_string(),
                format!(
                    "{} decisions, {} action items -> {}",
                    decision_count,
                    action_count,
                    actions.parent().unwrap_or(actions).display()
                ),
            ),
            OutcomeStatus::Skipped => ("skipped".to_string(), "already in ledger".to_string()),
            OutcomeStatus::Failed { stage, error } => {
                (format!("failed:{}", stage), error.clone())
            }
        };
        println!("{:<40} {:<10} {}", outcome.file_name, status, detail);
    }

    eprintln!(
        "\n[Batch {}: {} processed, {} skipped, {} failed]",
        report.batch_id,
        report.processed(),
        report.skipped(),
        report.failed()
    );
}
