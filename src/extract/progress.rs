//! Callbacks fired while an extraction runs

use crate::models::{ExtractionSummary, SkippedCommit};
use std::path::Path;

/// Observer for the user-facing milestones of a run.
pub trait Progress {
    /// History has been walked; `count` commits touch `file`.
    fn found(&mut self, count: usize, file: &str);

    /// A qualifying commit produced no record.
    fn skipped(&mut self, skipped: &SkippedCommit);

    /// All records have been written and flushed to `output`.
    fn finished(&mut self, summary: &ExtractionSummary, output: &Path);
}

/// Discards every event.
pub struct NullProgress;

impl Progress for NullProgress {
    fn found(&mut self, _count: usize, _file: &str) {}

    fn skipped(&mut self, _skipped: &SkippedCommit) {}

    fn finished(&mut self, _summary: &ExtractionSummary, _output: &Path) {}
}
