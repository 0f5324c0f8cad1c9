//! Export of published posts to a zip of Markdown documents.
//!
//! [`Exporter::run`] drives one run end to end: a staging tree is created,
//! every published record is rendered into it, the tree is packed into a
//! zip, the zip is handed to an [`ArchiveSink`], and everything on disk is
//! removed again.

mod archive;
mod deliver;
mod filter;
mod pipeline;
mod render;


pub use archive::{ArchiveError, ArchiveResult, ArchiveSummary, DEFAULT_EXPORT_FOLDER, build_archive};
pub(crate) use archive::is_single_component;
pub use deliver::{
    ARCHIVE_CONTENT_TYPE, ArchiveSink, DEFAULT_DOWNLOAD_NAME, DeliveryError, FileSink,
    HttpResponseSink, ResponseHeaders, WriterSink,
};
pub use filter::{AutoParagraphFilter, BodyFilter, FilterError, PassthroughFilter};
pub use pipeline::{ExportError, ExportOptions, ExportReport, ExportState, Exporter};
pub use render::{DocumentRenderer, RenderError, render_record};
