//! CLI definition and handler

mod extract;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

pub use extract::ConsoleProgress;

/// Revision Extractor - dump every revision of a JSON file in git history
#[derive(Parser, Debug)]
#[command(name = "revision-extractor")]
#[command(
    version,
    about = "Extract every historical revision of a JSON file from a git repository into a JSON Lines file",
    long_about = "Walks the git history of one file (newest commit first) and writes each \
revision that parses as JSON to a JSON Lines file, one \
{\"commit\", \"timestamp\", \"data\"} object per line.\n\n\
Commits where the file is missing, not UTF-8, or not valid JSON are reported \
and skipped. The output file is rebuilt from scratch on every run.",
    after_help = "\
Examples:
  revision-extractor                                   beer.json -> beer_versions.jsonl in the current repo
  revision-extractor --file data/menu.json -o menu.jsonl
  revision-extractor --repo /path/to/repo --quiet

Defaults can also be set in revisions.toml at the repository root:
  [extract]
  file = \"data/menu.json\"
  output = \"menu.jsonl\""
)]
pub struct Cli {
    /// Path to repository (default: current directory)
    #[arg(long, short = 'r', env = "REVISION_EXTRACTOR_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Tracked file, relative to the repository root (default: beer.json)
    #[arg(long, short = 'f', env = "REVISION_EXTRACTOR_FILE")]
    pub file: Option<String>,

    /// Output JSON Lines file (default: beer_versions.jsonl)
    #[arg(long, short = 'o', env = "REVISION_EXTRACTOR_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Suppress progress messages on stdout
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    extract::run(&cli.repo, cli.file, cli.output, cli.quiet)
}
