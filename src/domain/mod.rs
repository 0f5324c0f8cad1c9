//! Core types: Record, RecordId, post status/kind, rendered documents

mod document;
mod record;

pub use document::{CONTENT_DIR, DOCUMENT_EXTENSION, Preamble, RenderedDocument};
pub use record::{
    ParsePostFieldError, ParseRecordIdError, PostKind, PostStatus, Record, RecordBuilder, RecordId,
};
