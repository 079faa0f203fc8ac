//! Configuration module
//!
//! This module handles:
//! - Built-in defaults (`.`, `beer.json`, `beer_versions.jsonl`)
//! - Project-level configuration (`revisions.toml`)
//! - Resolving CLI/environment overrides into an [`ExtractConfig`]

mod extract_config;

pub use extract_config::{
    load_project_config, ExtractConfig, ExtractSection, ProjectConfig, DEFAULT_FILE,
    DEFAULT_OUTPUT, PROJECT_CONFIG_FILE,
};
