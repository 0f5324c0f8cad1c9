//! The export run: stage, render, archive, deliver, clean up.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::RecordId;
use crate::export::archive::{ArchiveError, DEFAULT_EXPORT_FOLDER, build_archive};
use crate::export::deliver::{ArchiveSink, DEFAULT_DOWNLOAD_NAME, DeliveryError, ResponseHeaders};
use crate::export::filter::BodyFilter;
use crate::export::render::{DocumentRenderer, RenderError};
use crate::infra::{CleanupReport, ContentHash, StagingError, StagingTree};
use crate::store::{ContentStore, StoreError};

/// Where an export run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Staging,
    Rendering,
    Archiving,
    Delivering,
    Aborting,
    CleaningUp,
    Done,
}

impl ExportState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Staging => "staging",
            Self::Rendering => "rendering",
            Self::Archiving => "archiving",
            Self::Delivering => "delivering",
            Self::Aborting => "aborting",
            Self::CleaningUp => "cleaning-up",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure that ends an export run.
///
/// Cleanup has always run by the time one of these is returned.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to prepare staging tree")]
    Staging(#[from] StagingError),

    #[error("failed to select records")]
    Select(#[source] StoreError),

    #[error("failed to render record {id}")]
    Render {
        id: RecordId,
        #[source]
        source: RenderError,
    },

    #[error("failed to build archive")]
    Archive(#[from] ArchiveError),

    #[error("failed to deliver archive")]
    Delivery(#[from] DeliveryError),
}

/// Per-run settings.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory the staging tree and archive are created in.
    pub temp_dir: PathBuf,
    /// Root folder of every archive entry.
    pub folder: String,
    /// Attachment filename sent with the archive.
    pub download_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir(),
            folder: DEFAULT_EXPORT_FOLDER.to_string(),
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct ExportReport {
    /// Number of records rendered into the archive.
    pub records: usize,
    /// Archive entry names in archive order.
    pub entries: Vec<String>,
    /// Archive size in bytes.
    pub bytes: u64,
    /// SHA-256 of the delivered archive.
    pub hash: ContentHash,
    pub download_name: String,
    pub cleanup: CleanupReport,
}

type TransitionHook<'a> = Box<dyn FnMut(ExportState) + 'a>;

/// Runs exports against a store and body filter.
///
/// The exporter holds no state between runs besides its current
/// [`ExportState`]; every run gets its own staging tree and archive.
pub struct Exporter<'a> {
    store: &'a dyn ContentStore,
    filter: &'a dyn BodyFilter,
    options: ExportOptions,
    state: ExportState,
    on_transition: Option<TransitionHook<'a>>,
}

impl<'a> Exporter<'a> {
    pub fn new(
        store: &'a dyn ContentStore,
        filter: &'a dyn BodyFilter,
        options: ExportOptions,
    ) -> Self {
        Self {
            store,
            filter,
            options,
            state: ExportState::Idle,
            on_transition: None,
        }
    }

    /// Registers a callback invoked on every state change.
    pub fn on_transition(mut self, hook: impl FnMut(ExportState) + 'a) -> Self {
        self.on_transition = Some(Box::new(hook));
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Exports every published record and delivers the archive to `sink`.
    ///
    /// The staging tree and archive are removed before this returns, whether
    /// the run succeeded or not. Cleanup problems are logged and reported in
    /// [`ExportReport::cleanup`] but never replace the run's own error.
    ///
    /// # Errors
    ///
    /// Returns the first failure from staging, selection, rendering,
    /// archiving or delivery. Nothing reaches the sink unless every record
    /// was rendered and archived.
    pub fn run(&mut self, sink: &mut dyn ArchiveSink) -> Result<ExportReport, ExportError> {
        self.state = ExportState::Idle;
        self.transition(ExportState::Staging);

        let tree = match StagingTree::create(&self.options.temp_dir) {
            Ok(tree) => tree,
            Err(e) => {
                self.transition(ExportState::Aborting);
                self.transition(ExportState::CleaningUp);
                self.transition(ExportState::Done);
                return Err(e.into());
            }
        };

        let result = self.produce(&tree, sink);
        if let Err(e) = &result {
            warn!(state = %self.state, error = %e, "export aborted");
            self.transition(ExportState::Aborting);
        }

        self.transition(ExportState::CleaningUp);
        let cleanup = tree.cleanup();
        self.transition(ExportState::Done);

        let mut report = result?;
        info!(
            records = report.records,
            bytes = report.bytes,
            hash = %report.hash,
            "export complete"
        );
        report.cleanup = cleanup;
        Ok(report)
    }

    fn produce(
        &mut self,
        tree: &StagingTree,
        sink: &mut dyn ArchiveSink,
    ) -> Result<ExportReport, ExportError> {
        self.transition(ExportState::Rendering);
        let ids = self
            .store
            .select_published_ids()
            .map_err(ExportError::Select)?;
        debug!(count = ids.len(), "selected records");

        let renderer = DocumentRenderer::new(self.store, self.filter);
        for &id in &ids {
            let document = renderer
                .render(id)
                .map_err(|source| ExportError::Render { id, source })?;
            tree.stage(&document)?;
        }

        self.transition(ExportState::Archiving);
        let summary = build_archive(tree.root(), tree.archive_path(), &self.options.folder)?;
        let hash = ContentHash::of_file(&summary.path).map_err(|source| ArchiveError::Io {
            path: summary.path.clone(),
            source,
        })?;
        debug!(entries = summary.entries.len(), bytes = summary.bytes, "built archive");

        self.transition(ExportState::Delivering);
        let headers = ResponseHeaders::new(&self.options.download_name, summary.bytes);
        let mut body = File::open(&summary.path).map_err(|source| ArchiveError::Io {
            path: summary.path.clone(),
            source,
        })?;
        sink.deliver(&headers, &mut body)?;

        Ok(ExportReport {
            records: ids.len(),
            entries: summary.entries,
            bytes: summary.bytes,
            hash,
            download_name: self.options.download_name.clone(),
            cleanup: CleanupReport::default(),
        })
    }

    fn transition(&mut self, next: ExportState) {
        debug!(from = %self.state, to = %next, "export state");
        self.state = next;
        if let Some(hook) = self.on_transition.as_mut() {
            hook(next);
        }
    }
}
