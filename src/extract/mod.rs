//! Revision extraction
//!
//! Walks the history of one file and writes every revision that parses as
//! JSON to a JSON Lines file:
//!
//! 1. List the commits that changed the file, newest first
//! 2. For each commit, read the blob at the path, decode UTF-8, parse JSON
//! 3. Append `{"commit", "timestamp", "data"}` as one line, or report the
//!    commit as skipped and move on
//!
//! Only per-commit read/decode/parse failures are recovered from. Failing to
//! open the repository, walk history or write the output aborts the run.

mod progress;

pub use progress::{NullProgress, Progress};

use crate::config::ExtractConfig;
use crate::git::{format_git_time, GitHistory};
use crate::models::{ExtractionSummary, RevisionRecord, SkippedCommit};
use anyhow::{Context, Result};
use git2::{Commit, ErrorCode, ObjectType, Repository};
use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Reasons a single commit contributes no record.
#[derive(Error, Debug)]
pub enum RevisionError {
    #[error("path '{path}' does not exist in this commit")]
    PathNotFound { path: String },

    #[error("path '{path}' is not a regular file")]
    NotAFile { path: String },

    #[error("content is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("content is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("commit time {seconds} is outside the representable date range")]
    InvalidTimestamp { seconds: i64 },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

/// Read `file_path` at `commit` and parse it as JSON.
pub fn read_revision(
    repo: &Repository,
    commit: &Commit,
    file_path: &str,
) -> Result<Value, RevisionError> {
    let tree = commit.tree()?;
    let entry = match tree.get_path(Path::new(file_path)) {
        Ok(entry) => entry,
        Err(e) if e.code() == ErrorCode::NotFound => {
            return Err(RevisionError::PathNotFound {
                path: file_path.to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    if entry.kind() != Some(ObjectType::Blob) {
        return Err(RevisionError::NotAFile {
            path: file_path.to_string(),
        });
    }

    let blob = repo.find_blob(entry.id())?;
    let text = std::str::from_utf8(blob.content())?;
    Ok(serde_json::from_str(text)?)
}

/// Build the output record for `commit`.
pub fn revision_record(
    repo: &Repository,
    commit: &Commit,
    file_path: &str,
) -> Result<RevisionRecord, RevisionError> {
    let time = commit.time();
    let timestamp = format_git_time(&time).ok_or(RevisionError::InvalidTimestamp {
        seconds: time.seconds(),
    })?;
    let data = read_revision(repo, commit, file_path)?;
    Ok(RevisionRecord {
        commit: commit.id().to_string(),
        timestamp,
        data,
    })
}

/// Run one extraction pass.
///
/// The repository is opened before the output file is created, so a bad
/// repository path leaves no output behind. The output file is truncated and
/// rebuilt on every run.
pub fn run(config: &ExtractConfig, progress: &mut dyn Progress) -> Result<ExtractionSummary> {
    let history = GitHistory::open(&config.repo)?;
    let repo = history.repository();

    let commits = history
        .get_file_commits(&config.file)
        .with_context(|| format!("Failed to walk history of {}", config.file))?;
    progress.found(commits.len(), &config.file);

    let file = File::create(&config.output)
        .with_context(|| format!("Failed to create output file {}", config.output.display()))?;
    let mut out = BufWriter::new(file);

    let mut summary = ExtractionSummary {
        qualifying: commits.len(),
        ..Default::default()
    };

    for oid in commits {
        let commit = repo.find_commit(oid)?;
        match revision_record(repo, &commit, &config.file) {
            Ok(record) => {
                write_record(&mut out, &record)
                    .with_context(|| format!("Failed to write {}", config.output.display()))?;
                debug!("Wrote revision {}", record.commit);
                summary.written += 1;
            }
            Err(e) => {
                let skipped = SkippedCommit {
                    commit: oid.to_string(),
                    error: e.to_string(),
                };
                progress.skipped(&skipped);
                summary.skipped.push(skipped);
            }
        }
    }

    out.flush()
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    info!(
        "Extracted {} of {} revisions of {} ({} skipped)",
        summary.written,
        summary.qualifying,
        config.file,
        summary.skipped_count()
    );
    progress.finished(&summary, &config.output);
    Ok(summary)
}

fn write_record<W: Write>(out: &mut W, record: &RevisionRecord) -> Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    Ok(())
}
