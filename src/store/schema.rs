//! SQLite schema for the content store.

use rusqlite::Connection;

/// Creates the content store schema.
///
/// The layout mirrors the publishing platform's tables closely enough that
/// an exported copy of a site database can be opened directly. Idempotent.
///
/// # Tables Created
/// - `users` - Authors and their display names
/// - `posts` - Content items of every status and kind
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            display_name TEXT NOT NULL
        );",
    )?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY,
            post_author INTEGER NOT NULL,
            post_title TEXT NOT NULL DEFAULT '',
            post_name TEXT NOT NULL DEFAULT '',
            post_content TEXT NOT NULL DEFAULT '',
            post_date TEXT NOT NULL,
            post_status TEXT NOT NULL,
            post_type TEXT NOT NULL
        );",
    )?;

    // Selection filters on both columns
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_posts_status_type
            ON posts(post_status, post_type);",
    )?;

    Ok(())
}
