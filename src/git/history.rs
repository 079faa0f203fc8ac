//! Path-filtered history walk using libgit2
//!
//! Lists the commits reachable from `HEAD` that changed one file, newest
//! first, with the same default history simplification `git rev-list HEAD --
//! <path>` applies: commits that leave the path untouched are hidden, and a
//! merge that kept one parent's version of the path is followed through that
//! parent only.

use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, TimeZone, Utc};
use git2::{Commit, ErrorCode, Oid, Repository};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};
use std::path::Path;
use tracing::{debug, trace};

/// State of the tracked path in one commit's tree: blob/tree id plus file
/// mode, or `None` when the path does not exist.
type PathState = Option<(Oid, i32)>;

/// Git history reader using libgit2.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open a git repository.
    ///
    /// # Arguments
    /// * `path` - Path to the repository (or any subdirectory)
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Get the repository root path.
    pub fn repo_root(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory (bare repo?)")
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Get every commit that changed `file_path`, newest first.
    ///
    /// An unborn `HEAD` (no commits yet) yields an empty list.
    ///
    /// # Arguments
    /// * `file_path` - Relative path to file within repo
    pub fn get_file_commits(&self, file_path: &str) -> Result<Vec<Oid>> {
        let head = match self.repo.head() {
            Ok(head) => head
                .peel_to_commit()
                .context("HEAD does not point to a commit")?,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                debug!("HEAD is unborn, no history to walk");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).context("Failed to resolve HEAD"),
        };

        let path = Path::new(file_path);
        let mut walk = DateOrderedWalk::default();
        walk.push(&head);

        let mut commits = Vec::new();

        while let Some(oid) = walk.pop() {
            let commit = self.repo.find_commit(oid)?;
            let state = path_state(&commit, path)?;

            let parents: Vec<Commit> = commit.parents().collect();
            if parents.is_empty() {
                if state.is_some() {
                    trace!("{} introduces {}", oid, file_path);
                    commits.push(oid);
                }
                continue;
            }

            // The first parent that agrees on the path explains the commit's
            // content; history beyond the other parents is pruned.
            let mut same_parent = None;
            for parent in &parents {
                if path_state(parent, path)? == state {
                    same_parent = Some(parent);
                    break;
                }
            }

            match same_parent {
                Some(parent) => walk.push(parent),
                None => {
                    trace!("{} changes {}", oid, file_path);
                    commits.push(oid);
                    for parent in &parents {
                        walk.push(parent);
                    }
                }
            }
        }

        debug!("{} commits touch {}", commits.len(), file_path);
        Ok(commits)
    }
}

/// Look up the tracked path in a commit's tree.
fn path_state(commit: &Commit, path: &Path) -> Result<PathState> {
    let tree = commit.tree()?;
    match tree.get_path(path) {
        Ok(entry) => Ok(Some((entry.id(), entry.filemode()))),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Commit queued for the walk. Newer commit time pops first; equal times pop
/// in the order they were discovered.
#[derive(PartialEq, Eq)]
struct Pending {
    time: i64,
    seq: Reverse<u64>,
    oid: Oid,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct DateOrderedWalk {
    queue: BinaryHeap<Pending>,
    seen: HashSet<Oid>,
    next_seq: u64,
}

impl DateOrderedWalk {
    fn push(&mut self, commit: &Commit) {
        if !self.seen.insert(commit.id()) {
            return;
        }
        self.queue.push(Pending {
            time: commit.time().seconds(),
            seq: Reverse(self.next_seq),
            oid: commit.id(),
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<Oid> {
        self.queue.pop().map(|p| p.oid)
    }
}

/// Format a git timestamp as ISO 8601, keeping the recorded UTC offset.
///
/// Returns `None` when the time cannot be represented as a calendar date.
pub fn format_git_time(time: &git2::Time) -> Option<String> {
    let offset =
        FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    offset
        .timestamp_opt(time.seconds(), 0)
        .single()
        .map(|dt| dt.to_rfc3339())
}
