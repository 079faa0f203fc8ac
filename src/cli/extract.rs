//! Extract command - write every revision of the tracked file to JSON Lines

use crate::config::ExtractConfig;
use crate::extract::{self, NullProgress, Progress};
use crate::models::{ExtractionSummary, SkippedCommit};
use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prints run milestones to stdout.
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn found(&mut self, count: usize, file: &str) {
        println!("Found {} commits affecting {}", count, file);
    }

    fn skipped(&mut self, skipped: &SkippedCommit) {
        println!(
            "{} {} due to error: {}",
            style("Skipping commit").yellow(),
            skipped.commit,
            skipped.error
        );
    }

    fn finished(&mut self, _summary: &ExtractionSummary, output: &Path) {
        println!(
            "{} {}",
            style("All versions extracted into").green(),
            output.display()
        );
    }
}

pub fn run(repo: &Path, file: Option<String>, output: Option<PathBuf>, quiet: bool) -> Result<()> {
    let config = ExtractConfig::resolve(repo, file, output)?;
    debug!("Resolved config: {:?}", config);

    let summary = if quiet {
        extract::run(&config, &mut NullProgress)?
    } else {
        extract::run(&config, &mut ConsoleProgress)?
    };

    debug!(
        "{} written, {} skipped",
        summary.written,
        summary.skipped_count()
    );
    Ok(())
}
