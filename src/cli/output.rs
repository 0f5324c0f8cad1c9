//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
    /// Archive entry paths, one per line
    Paths,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single post in listing output.
#[derive(Debug, Serialize)]
pub struct PostListing {
    pub id: i64,
    pub slug: String,
    pub title: String,
    /// Entry path the post would get inside the archive.
    pub path: String,
}

/// Summary of a finished export.
#[derive(Debug, Serialize)]
pub struct ExportSummary {
    pub records: usize,
    pub bytes: u64,
    pub sha256: String,
    /// Where the archive went: a file path, `stdout`, or `http`.
    pub destination: String,
    pub entries: Vec<String>,
}
