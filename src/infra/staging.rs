//! Ephemeral staging tree for one export run.

use crate::domain::{CONTENT_DIR, RenderedDocument};
use std::fs;
use std::io::{self, Write as IoWrite};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};
use ulid::Ulid;

/// Name prefix shared by staging directories and archive files.
pub const STAGING_PREFIX: &str = "wp-pico-";

/// Errors while creating or writing the staging tree.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create staging directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("document path escapes the staging tree: {path}")]
    OutsideTree { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One path that could not be removed during cleanup.
#[derive(Debug)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Outcome of removing a staging tree and its archive.
///
/// Failures are collected rather than returned so they never mask the
/// outcome of the run being cleaned up.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// Returns true if everything was removed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A uniquely named temporary directory plus the archive path that goes with it.
///
/// Both names carry a ULID (millisecond time + 80 random bits), so
/// concurrent runs in the same base directory never collide. The tree is
/// removed by [`StagingTree::cleanup`], or on drop if cleanup was never called.
#[derive(Debug)]
pub struct StagingTree {
    root: PathBuf,
    archive_path: PathBuf,
    cleaned: bool,
}

impl StagingTree {
    /// Creates `<base>/wp-pico-<ULID>/content/`.
    ///
    /// # Errors
    ///
    /// Returns `StagingError::CreateDir` if either directory cannot be created.
    pub fn create(base: &Path) -> Result<Self, StagingError> {
        let run_id = Ulid::new();
        let root = base.join(format!("{}{}", STAGING_PREFIX, run_id));
        let archive_path = base.join(format!("{}{}.zip", STAGING_PREFIX, run_id));

        fs::create_dir(&root).map_err(|e| StagingError::CreateDir {
            path: root.clone(),
            source: e,
        })?;

        // From here on the tree exists and must be cleaned up
        let tree = Self {
            root,
            archive_path,
            cleaned: false,
        };

        let content = tree.content_dir();
        fs::create_dir(&content).map_err(|e| StagingError::CreateDir {
            path: content,
            source: e,
        })?;

        debug!(root = %tree.root.display(), "created staging tree");
        Ok(tree)
    }

    /// Returns the tree root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `content/` directory inside the tree.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join(CONTENT_DIR)
    }

    /// Returns where this run's archive is written (outside the tree).
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Writes a document to `<root>/<document.path>`.
    ///
    /// Parent directories are created as needed and an existing file is
    /// replaced. The text goes to a sibling temporary file that is renamed
    /// into place, so a failed write never leaves a partial document.
    ///
    /// # Errors
    ///
    /// Returns `StagingError::OutsideTree` if the document path is absolute or
    /// contains `..`, and an I/O variant if the write fails.
    pub fn stage(&self, document: &RenderedDocument) -> Result<PathBuf, StagingError> {
        let relative = document.path();
        if !is_contained(relative) {
            return Err(StagingError::OutsideTree {
                path: relative.to_path_buf(),
            });
        }

        let target = self.root.join(relative);
        let parent = target
            .parent()
            .ok_or_else(|| StagingError::OutsideTree {
                path: relative.to_path_buf(),
            })?;

        fs::create_dir_all(parent).map_err(|e| StagingError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| StagingError::Io {
            path: target.clone(),
            source: e,
        })?;

        temp.write_all(document.text().as_bytes())
            .map_err(|e| StagingError::Io {
                path: target.clone(),
                source: e,
            })?;

        temp.persist(&target).map_err(|e| StagingError::AtomicWrite {
            path: target.clone(),
            source: e.error,
        })?;

        Ok(target)
    }

    /// Removes the tree recursively and the archive file if present.
    ///
    /// Best-effort: missing paths are fine, other failures are logged and
    /// reported but never returned as errors.
    pub fn cleanup(mut self) -> CleanupReport {
        self.cleaned = true;
        remove_all(&self.root, &self.archive_path)
    }
}

impl Drop for StagingTree {
    fn drop(&mut self) {
        if !self.cleaned {
            remove_all(&self.root, &self.archive_path);
        }
    }
}

fn remove_all(root: &Path, archive_path: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();

    if let Err(e) = fs::remove_dir_all(root)
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %root.display(), error = %e, "failed to remove staging tree");
        report.failures.push(CleanupFailure {
            path: root.to_path_buf(),
            error: e,
        });
    }

    if let Err(e) = fs::remove_file(archive_path)
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %archive_path.display(), error = %e, "failed to remove archive");
        report.failures.push(CleanupFailure {
            path: archive_path.to_path_buf(),
            error: e,
        });
    }

    if report.is_clean() {
        debug!(root = %root.display(), "removed staging tree and archive");
    }
    report
}

/// True if `path` is relative and never climbs out of its base.
fn is_contained(path: &Path) -> bool {
    path.components().count() > 0
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
