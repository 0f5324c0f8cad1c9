//! Command handlers for the CLI.

mod completions;
mod export;
mod list;


use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::{CONTENT_DIR, DOCUMENT_EXTENSION};
use crate::store::SqliteStore;

// Re-export public items
pub use completions::handle_completions;
pub use export::handle_export;
pub use list::handle_list;

// Re-export for tests
#[cfg(test)]
pub(crate) use export::write_summary;
#[cfg(test)]
pub(crate) use list::{collect_listings, write_listings};

// ===========================================
// Shared Utilities
// ===========================================

/// Opens the content database, naming the path on failure.
pub(crate) fn open_store(db: &Path) -> Result<SqliteStore> {
    SqliteStore::open(db)
        .with_context(|| format!("failed to open content database {}", db.display()))
}

/// Returns the archive entry path a slug ends up at.
pub(crate) fn entry_path(folder: &str, slug: &str) -> String {
    format!("{}/{}/{}.{}", folder, CONTENT_DIR, slug, DOCUMENT_EXTENSION)
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
