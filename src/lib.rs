//! Revision Extractor - every historical revision of a JSON file, as JSON Lines
//!
//! Walks the git history of one tracked file and writes each revision that
//! parses as JSON to a line-delimited output, tagged with its commit hash and
//! commit timestamp.

pub mod cli;
pub mod config;
pub mod extract;
pub mod git;
pub mod models;
