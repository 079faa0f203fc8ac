//! Git history module
//!
//! Opens repositories and walks the history of a single tracked path.
//!
//! # Example
//!
//! ```no_run
//! use revision_extractor::git::GitHistory;
//! use std::path::Path;
//!
//! let history = GitHistory::open(Path::new("/path/to/repo")).unwrap();
//! let commits = history.get_file_commits("beer.json").unwrap();
//! println!("{} commits touch beer.json", commits.len());
//! ```

pub mod history;

#[cfg(test)]
pub(crate) mod test_repo;

pub use history::{format_git_time, GitHistory};
