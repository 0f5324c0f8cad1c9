//! ContentStore trait implementation for SqliteStore.

use super::SqliteStore;
use crate::domain::{PostKind, PostStatus, Record, RecordId};
use crate::store::{ContentStore, StoreError, StoreResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

impl ContentStore for SqliteStore {
    fn select_published_ids(&self) -> StoreResult<Vec<RecordId>> {
        let mut stmt = self.conn.prepare(
            "SELECT id FROM posts
             WHERE post_status = ?1 AND post_type = ?2
             ORDER BY id",
        )?;

        let ids = stmt
            .query_map([PostStatus::Publish.as_str(), PostKind::Post.as_str()], |row| {
                row.get::<_, i64>(0)
            })?
            .map(|r| r.map(RecordId::new))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = ids.len(), "selected published posts");
        Ok(ids)
    }

    fn fetch_record(&self, id: RecordId) -> StoreResult<Record> {
        let mut stmt = self.conn.prepare(
            "SELECT p.post_title, u.display_name, p.post_date, p.post_content, p.post_name
             FROM posts p
             LEFT JOIN users u ON u.id = p.post_author
             WHERE p.id = ?1",
        )?;

        let row = stmt.query_row([id.get()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        });

        let (title, author, date_str, content, slug) = match row {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StoreError::RecordNotFound { id });
            }
            Err(e) => return Err(StoreError::Database(e)),
        };

        let author = author.ok_or_else(|| StoreError::InvalidRecord {
            id,
            reason: "author does not exist".to_string(),
        })?;

        let published = parse_post_date(&date_str).ok_or_else(|| StoreError::InvalidRecord {
            id,
            reason: format!("unparseable post date '{}'", date_str),
        })?;

        Ok(Record::builder(id, slug, published)
            .title(title)
            .author(author)
            .body(content)
            .build())
    }
}

/// Parses a stored post date.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` (the platform's native format), RFC 3339,
/// or a bare `YYYY-MM-DD`.
pub(crate) fn parse_post_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
