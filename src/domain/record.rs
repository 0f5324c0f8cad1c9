//! Content records as read from the store.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a content record.
///
/// Opaque to the exporter: it is only ever handed back to the store that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wraps a raw store identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw store identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing an invalid record identifier.
#[derive(Debug, Clone)]
pub struct ParseRecordIdError(String);

impl fmt::Display for ParseRecordIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid record id '{}': expected an integer", self.0)
    }
}

impl std::error::Error for ParseRecordIdError {}

impl FromStr for RecordId {
    type Err = ParseRecordIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(RecordId)
            .map_err(|_| ParseRecordIdError(s.to_string()))
    }
}

/// Publication status of a post, using the stored string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostStatus {
    Publish,
    Future,
    Draft,
    Pending,
    Private,
    Trash,
    AutoDraft,
    Inherit,
}

impl PostStatus {
    /// Returns the value stored in the `post_status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Future => "future",
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Private => "private",
            PostStatus::Trash => "trash",
            PostStatus::AutoDraft => "auto-draft",
            PostStatus::Inherit => "inherit",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status or kind.
#[derive(Debug, Clone)]
pub struct ParsePostFieldError {
    field: &'static str,
    value: String,
}

impl fmt::Display for ParsePostFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown post {} '{}'", self.field, self.value)
    }
}

impl std::error::Error for ParsePostFieldError {}

impl FromStr for PostStatus {
    type Err = ParsePostFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(PostStatus::Publish),
            "future" => Ok(PostStatus::Future),
            "draft" => Ok(PostStatus::Draft),
            "pending" => Ok(PostStatus::Pending),
            "private" => Ok(PostStatus::Private),
            "trash" => Ok(PostStatus::Trash),
            "auto-draft" => Ok(PostStatus::AutoDraft),
            "inherit" => Ok(PostStatus::Inherit),
            other => Err(ParsePostFieldError {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of content item. Only [`PostKind::Post`] is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostKind {
    Post,
    Page,
    Attachment,
    Revision,
    NavMenuItem,
}

impl PostKind {
    /// Returns the value stored in the `post_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            PostKind::Post => "post",
            PostKind::Page => "page",
            PostKind::Attachment => "attachment",
            PostKind::Revision => "revision",
            PostKind::NavMenuItem => "nav_menu_item",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostKind {
    type Err = ParsePostFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(PostKind::Post),
            "page" => Ok(PostKind::Page),
            "attachment" => Ok(PostKind::Attachment),
            "revision" => Ok(PostKind::Revision),
            "nav_menu_item" => Ok(PostKind::NavMenuItem),
            other => Err(ParsePostFieldError {
                field: "kind",
                value: other.to_string(),
            }),
        }
    }
}

/// A read-only snapshot of one exportable content item.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    title: String,
    author: String,
    published: NaiveDateTime,
    body: String,
    slug: String,
}

impl Record {
    /// Creates a builder with the fields every record must have.
    pub fn builder(
        id: RecordId,
        slug: impl Into<String>,
        published: NaiveDateTime,
    ) -> RecordBuilder {
        RecordBuilder {
            id,
            title: String::new(),
            author: String::new(),
            published,
            body: String::new(),
            slug: slug.into(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the author's display name.
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn published(&self) -> NaiveDateTime {
        self.published
    }

    /// Returns the publish date at day granularity.
    pub fn published_date(&self) -> NaiveDate {
        self.published.date()
    }

    /// Returns the body HTML as stored (before any filtering).
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the filesystem-safe name used as the output file stem.
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

/// Builder for constructing a [`Record`].
pub struct RecordBuilder {
    id: RecordId,
    title: String,
    author: String,
    published: NaiveDateTime,
    body: String,
    slug: String,
}

impl RecordBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Record {
        Record {
            id: self.id,
            title: self.title,
            author: self.author,
            published: self.published,
            body: self.body,
            slug: self.slug,
        }
    }
}
