//! ContentStore trait and error types.

use crate::domain::{Record, RecordId};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while selecting or fetching records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist (deleted between selection and fetch).
    #[error("record not found: {id}")]
    RecordNotFound { id: RecordId },

    /// The record exists but cannot be turned into a [`Record`].
    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: RecordId, reason: String },

    /// The database file does not exist.
    #[error("content store not found: {path}")]
    DatabaseNotFound { path: PathBuf },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The store could not be reached at all.
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to the content store.
///
/// Selection returns identifiers only; bodies are fetched one record at a
/// time so large stores never have to be held in memory at once.
pub trait ContentStore {
    /// Returns the identifiers of every published post, in a deterministic order.
    ///
    /// Drafts, pages, attachments and every other status or kind are excluded.
    fn select_published_ids(&self) -> StoreResult<Vec<RecordId>>;

    /// Fetches the full record for one identifier.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RecordNotFound` if the record no longer exists.
    fn fetch_record(&self, id: RecordId) -> StoreResult<Record>;
}

impl<S: ContentStore + ?Sized> ContentStore for &S {
    fn select_published_ids(&self) -> StoreResult<Vec<RecordId>> {
        (**self).select_published_ids()
    }

    fn fetch_record(&self, id: RecordId) -> StoreResult<Record> {
        (**self).fetch_record(id)
    }
}
