//! Rendered Markdown documents and their metadata preamble.

use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

use super::Record;

/// Subdirectory of the staging tree that holds every document.
pub const CONTENT_DIR: &str = "content";

/// File extension of rendered documents.
pub const DOCUMENT_EXTENSION: &str = "md";

/// The comment-style metadata block at the top of every document.
///
/// # Format
/// ```text
/// /*
/// Title: Hello
/// Author: Ann
/// Date: 2024/03/05
/// */
///
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    title: String,
    author: String,
    date: NaiveDate,
}

impl Preamble {
    pub fn new(title: impl Into<String>, author: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            date,
        }
    }

    /// Builds the preamble from a record's title, author and publish date.
    pub fn from_record(record: &Record) -> Self {
        Self::new(record.title(), record.author(), record.published_date())
    }

    /// Returns the date formatted as `YYYY/MM/DD`.
    pub fn date_stamp(&self) -> String {
        self.date.format("%Y/%m/%d").to_string()
    }
}

impl fmt::Display for Preamble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/*")?;
        writeln!(f, "Title: {}", header_value(&self.title))?;
        writeln!(f, "Author: {}", header_value(&self.author))?;
        writeln!(f, "Date: {}", self.date_stamp())?;
        writeln!(f, "*/")?;
        writeln!(f)
    }
}

/// Flattens a header value to one line that cannot close the comment block.
fn header_value(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("*/", "* /")
}

/// A document ready to be staged: a relative target path and its full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    path: PathBuf,
    text: String,
}

impl RenderedDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Returns the path relative to the staging tree root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
