//! Connection management for SqliteStore.

use super::SqliteStore;
use crate::store::{StoreError, StoreResult, create_schema};
use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::Path;

impl SqliteStore {
    // ===========================================
    // In-Memory Connection
    // ===========================================

    /// Opens an in-memory database with the content schema.
    ///
    /// Useful for tests and for seeding throwaway stores.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===========================================
    // File-Based Connection
    // ===========================================

    /// Opens an existing content database.
    ///
    /// Never creates a file: exporting from a path that does not exist is a
    /// configuration mistake, not an empty site.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DatabaseNotFound` if nothing exists at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if !path.is_file() {
            return Err(StoreError::DatabaseNotFound {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Opens or creates a database at `path` and initializes the schema.
    ///
    /// Creates parent directories if they don't exist.
    pub fn create(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(format!("{}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(path)?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    // ===========================================
    // Connection Accessors
    // ===========================================

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
