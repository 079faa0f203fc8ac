//! Extraction settings and the optional `revisions.toml` project file
//!
//! # Configuration Format
//!
//! ```toml
//! # revisions.toml
//!
//! [extract]
//! file = "data/beer.json"
//! output = "history/beer_versions.jsonl"
//! ```
//!
//! Values from the project file sit between the built-in defaults and
//! explicit CLI flags or environment variables. The file is looked up in the
//! root of the working copy that contains `--repo`, and a project-file
//! `output` is resolved against that same root.

use crate::git::GitHistory;
use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_FILE: &str = "beer.json";
pub const DEFAULT_OUTPUT: &str = "beer_versions.jsonl";
pub const PROJECT_CONFIG_FILE: &str = "revisions.toml";

/// Contents of `revisions.toml`
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub extract: ExtractSection,
}

/// `[extract]` table
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExtractSection {
    /// Tracked file, relative to the repository root
    pub file: Option<String>,
    /// Output JSON Lines file
    pub output: Option<PathBuf>,
}

/// Fully resolved inputs for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Repository working copy (or any directory inside it)
    pub repo: PathBuf,
    /// Tracked file, relative to the repository root, `/`-separated
    pub file: String,
    /// Output file; truncated at the start of every run
    pub output: PathBuf,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            file: DEFAULT_FILE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ExtractConfig {
    pub fn new(repo: impl Into<PathBuf>, file: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            file: file.into(),
            output: output.into(),
        }
    }

    /// Resolve settings with priority:
    /// 1. Explicit overrides (CLI flags / environment, highest)
    /// 2. Project config (`revisions.toml` at the repository root)
    /// 3. Built-in defaults
    pub fn resolve(
        repo: &Path,
        file: Option<String>,
        output: Option<PathBuf>,
    ) -> Result<Self> {
        let root = project_root(repo);
        let project = load_project_config(&root);

        let file = file
            .or(project.extract.file)
            .unwrap_or_else(|| DEFAULT_FILE.to_string());
        let output = output
            .or_else(|| project.extract.output.map(|p| root.join(p)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let config = Self {
            repo: repo.to_path_buf(),
            file: normalize_file_path(&file),
            output,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that can never address a file in history.
    pub fn validate(&self) -> Result<()> {
        if self.file.is_empty() {
            bail!("Tracked file path is empty");
        }
        if self.file.starts_with('/') || Path::new(&self.file).is_absolute() {
            bail!(
                "Tracked file path must be relative to the repository root, got {}",
                self.file
            );
        }
        if self.file.split('/').any(|c| c == "..") {
            bail!("Tracked file path may not leave the repository: {}", self.file);
        }
        if self.output.as_os_str().is_empty() {
            bail!("Output path is empty");
        }
        Ok(())
    }
}

/// Strip `./` prefixes and use `/` separators, the form tree lookups expect.
/// A leading `/` is kept so `validate` can reject it.
fn normalize_file_path(file: &str) -> String {
    let file = file.trim().replace('\\', "/");
    let relative = file
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect::<Vec<_>>()
        .join("/");
    if file.starts_with('/') {
        format!("/{}", relative)
    } else {
        relative
    }
}

/// Working-copy root of the repository containing `repo`. Falls back to
/// `repo` itself when it is not inside a working copy; opening the repository
/// for extraction reports that error later.
fn project_root(repo: &Path) -> PathBuf {
    let history = match GitHistory::open(repo) {
        Ok(history) => history,
        Err(e) => {
            debug!("{:#}", e);
            return repo.to_path_buf();
        }
    };
    match history.repo_root() {
        Ok(root) => root.to_path_buf(),
        Err(e) => {
            debug!("{:#}", e);
            repo.to_path_buf()
        }
    }
}

/// Load `revisions.toml` from `repo_path`, falling back to defaults when the
/// file is absent or unreadable.
pub fn load_project_config(repo_path: &Path) -> ProjectConfig {
    let toml_path = repo_path.join(PROJECT_CONFIG_FILE);
    if !toml_path.exists() {
        debug!("No project config found, using defaults");
        return ProjectConfig::default();
    }

    match load_toml_config(&toml_path) {
        Ok(config) => {
            debug!("Loaded project config from {}", toml_path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {}", toml_path.display(), e);
            ProjectConfig::default()
        }
    }
}

fn load_toml_config(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}
