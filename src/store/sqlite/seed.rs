//! Insertion helpers for populating a store.

use super::SqliteStore;
use crate::domain::{PostKind, PostStatus, RecordId};
use crate::store::StoreResult;
use chrono::NaiveDateTime;
use rusqlite::params;

/// A post to insert into the store.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub date: NaiveDateTime,
    pub status: PostStatus,
    pub kind: PostKind,
}

impl NewPost {
    /// Creates a published post with an empty title and body.
    pub fn new(author_id: i64, slug: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            author_id,
            title: String::new(),
            slug: slug.into(),
            content: String::new(),
            date,
            status: PostStatus::Publish,
            kind: PostKind::Post,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn kind(mut self, kind: PostKind) -> Self {
        self.kind = kind;
        self
    }
}

impl SqliteStore {
    /// Inserts an author and returns their id.
    pub fn insert_user(&self, display_name: &str) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO users (display_name) VALUES (?1)",
            [display_name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Inserts a post and returns its identifier.
    pub fn insert_post(&self, post: &NewPost) -> StoreResult<RecordId> {
        self.conn.execute(
            "INSERT INTO posts
                (post_author, post_title, post_name, post_content, post_date, post_status, post_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                post.author_id,
                post.title,
                post.slug,
                post.content,
                post.date.format("%Y-%m-%d %H:%M:%S").to_string(),
                post.status.as_str(),
                post.kind.as_str(),
            ],
        )?;
        Ok(RecordId::new(self.conn.last_insert_rowid()))
    }

    /// Deletes a post.
    pub fn delete_post(&self, id: RecordId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM posts WHERE id = ?1", [id.get()])?;
        Ok(())
    }
}
