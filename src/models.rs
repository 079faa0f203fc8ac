//! Core data models for revision extraction
//!
//! A run produces one [`RevisionRecord`] per readable revision and an
//! [`ExtractionSummary`] describing what was written and what was skipped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One historical revision of the tracked file, written as a single JSON line.
///
/// Field order is the on-disk key order: `commit`, `timestamp`, `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionRecord {
    /// Full commit hash
    pub commit: String,
    /// Committer time (ISO 8601, with the committer's UTC offset)
    pub timestamp: String,
    /// File content at that commit, parsed as JSON
    pub data: Value,
}

/// A qualifying commit that contributed no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCommit {
    pub commit: String,
    pub error: String,
}

/// Outcome of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Commits the history walk reported for the path
    pub qualifying: usize,
    /// Records written to the output file
    pub written: usize,
    pub skipped: Vec<SkippedCommit>,
}

impl ExtractionSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Every qualifying commit is either written or skipped, never both.
    pub fn is_complete(&self) -> bool {
        self.written + self.skipped.len() == self.qualifying
    }
}
