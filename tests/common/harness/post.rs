//! Builder for test posts with sensible defaults.

use chrono::{NaiveDate, NaiveDateTime};
use pico_export::domain::{PostKind, PostStatus};
use pico_export::store::NewPost;

/// Builder for creating test posts with sensible defaults.
///
/// Defaults to a published post dated 2024-01-15 by "Test Author", with a
/// slug derived from the title.
#[derive(Debug)]
pub struct TestPost {
    title: String,
    slug: String,
    author: String,
    date: NaiveDateTime,
    body: String,
    status: PostStatus,
    kind: PostKind,
}

impl TestPost {
    /// Creates a new published post with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let slug = title
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        Self {
            title,
            slug,
            author: "Test Author".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15)
                .and_then(|d| d.and_hms_opt(10, 30, 0))
                .expect("valid date"),
            body: String::new(),
            status: PostStatus::Publish,
            kind: PostKind::Post,
        }
    }

    /// Sets an explicit slug.
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Sets the author's display name.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the publish date.
    pub fn date(mut self, year: i32, month: u32, day: u32) -> Self {
        self.date = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid date");
        self
    }

    /// Sets the HTML body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Marks the post as a draft.
    pub fn draft(mut self) -> Self {
        self.status = PostStatus::Draft;
        self
    }

    /// Makes the post a page instead of a blog post.
    pub fn page(mut self) -> Self {
        self.kind = PostKind::Page;
        self
    }

    pub fn get_slug(&self) -> &str {
        &self.slug
    }

    pub fn get_author(&self) -> &str {
        &self.author
    }

    /// Converts to a row for the given author id.
    pub fn to_new_post(&self, author_id: i64) -> NewPost {
        NewPost::new(author_id, self.slug.clone(), self.date)
            .title(self.title.clone())
            .content(self.body.clone())
            .status(self.status)
            .kind(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_defaults() {
        let post = TestPost::new("Hello World");
        assert_eq!(post.get_slug(), "hello-world");
        assert_eq!(post.get_author(), "Test Author");
        assert_eq!(post.status, PostStatus::Publish);
        assert_eq!(post.kind, PostKind::Post);
    }

    #[test]
    fn test_post_builders() {
        let post = TestPost::new("X").slug("custom").author("Ann").draft().page();
        assert_eq!(post.get_slug(), "custom");
        assert_eq!(post.get_author(), "Ann");
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.kind, PostKind::Page);
    }

    #[test]
    fn test_post_to_new_post() {
        let row = TestPost::new("Dated").date(2024, 3, 5).to_new_post(7);
        assert_eq!(row.author_id, 7);
        assert_eq!(row.slug, "dated");
        assert_eq!(row.date.format("%Y-%m-%d").to_string(), "2024-03-05");
    }
}
