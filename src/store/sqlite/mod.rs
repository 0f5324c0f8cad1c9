//! SQLite-backed content store implementation.

mod connection;
mod repo_impl;
mod seed;


use rusqlite::Connection;

pub use seed::NewPost;

// ===========================================
// SqliteStore Struct
// ===========================================

/// SQLite-backed content store.
///
/// Owns the database connection; one store is opened per export run.
pub struct SqliteStore {
    pub(crate) conn: Connection,
}
