//! Record to Markdown document rendering.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::convert::html_to_markdown;
use crate::domain::{CONTENT_DIR, DOCUMENT_EXTENSION, Preamble, Record, RecordId, RenderedDocument};
use crate::export::archive::is_single_component;
use crate::export::filter::{BodyFilter, FilterError};
use crate::store::{ContentStore, StoreError};

/// Errors that stop a record from becoming a document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to filter body of record {id}: {source}")]
    Filter {
        id: RecordId,
        #[source]
        source: FilterError,
    },

    /// The slug would not name a single file inside `content/`.
    #[error("record {id} has an unusable slug: {slug:?}")]
    UnsafeSlug { id: RecordId, slug: String },
}

/// Fetches records and turns them into staged-ready documents.
pub struct DocumentRenderer<'a> {
    store: &'a dyn ContentStore,
    filter: &'a dyn BodyFilter,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(store: &'a dyn ContentStore, filter: &'a dyn BodyFilter) -> Self {
        Self { store, filter }
    }

    /// Fetches one record and renders it.
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Store` if the record cannot be fetched (including
    /// when it was deleted after selection), `RenderError::Filter` if the body
    /// filter fails, and `RenderError::UnsafeSlug` for slugs that could escape
    /// the content directory.
    pub fn render(&self, id: RecordId) -> Result<RenderedDocument, RenderError> {
        let record = self.store.fetch_record(id)?;
        let document = render_record(&record, self.filter)?;
        debug!(%id, path = %document.path().display(), "rendered record");
        Ok(document)
    }
}

/// Renders an already fetched record.
pub fn render_record(
    record: &Record,
    filter: &dyn BodyFilter,
) -> Result<RenderedDocument, RenderError> {
    let path = document_path(record)?;

    let html = filter
        .render_body(record.body())
        .map_err(|source| RenderError::Filter {
            id: record.id(),
            source,
        })?;
    let body = html_to_markdown(&html);

    let mut text = Preamble::from_record(record).to_string();
    if !body.is_empty() {
        text.push_str(&body);
        text.push('\n');
    }

    Ok(RenderedDocument::new(path, text))
}

/// Returns `content/<slug>.md`, rejecting slugs that are not a single plain name.
fn document_path(record: &Record) -> Result<PathBuf, RenderError> {
    let slug = record.slug();
    if !is_single_component(slug) {
        return Err(RenderError::UnsafeSlug {
            id: record.id(),
            slug: slug.to_string(),
        });
    }
    Ok(PathBuf::from(CONTENT_DIR).join(format!("{}.{}", slug, DOCUMENT_EXTENSION)))
}
