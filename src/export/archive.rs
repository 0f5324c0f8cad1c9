//! Zip packaging of a staged tree.

use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Root folder of every archive entry unless configured otherwise.
pub const DEFAULT_EXPORT_FOLDER: &str = "wp-to-pico-export";

/// Errors while building an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("invalid export folder name: {folder:?}")]
    InvalidFolder { folder: String },

    #[error("failed to create archive {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk staging tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("zip error for {path}: {source}")]
    Zip {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// What ended up in a finished archive.
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
    /// Size of the archive file in bytes.
    pub bytes: u64,
}

/// Packs every regular file under `tree_root` into a zip at `output_path`.
///
/// Entries are named `<folder>/<path relative to tree_root>` with `/`
/// separators, so nothing about the host's temporary directory leaks into
/// the archive. Files are added in file-name order with a fixed timestamp,
/// which makes the archive reproducible for identical input. Directories
/// are implied by entry names; symlinks and other special files are skipped.
///
/// # Errors
///
/// Fails on an invalid folder name, or on any I/O or zip error. The partial
/// archive is left for the caller's cleanup.
pub fn build_archive(
    tree_root: &Path,
    output_path: &Path,
    folder: &str,
) -> ArchiveResult<ArchiveSummary> {
    if !is_single_component(folder) {
        return Err(ArchiveError::InvalidFolder {
            folder: folder.to_string(),
        });
    }

    let file = File::create(output_path).map_err(|source| ArchiveError::Create {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);

    let mut entries = Vec::new();
    for entry in WalkDir::new(tree_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(tree_root)
            .map_err(|_| ArchiveError::Io {
                path: entry.path().to_path_buf(),
                source: io::Error::other("entry outside staging tree"),
            })?;
        let name = entry_name(folder, relative);

        add_file(&mut writer, &name, entry.path(), options)?;
        debug!(entry = %name, "archived");
        entries.push(name);
    }

    let file = writer.finish().map_err(|source| ArchiveError::Zip {
        path: output_path.to_path_buf(),
        source,
    })?;
    let bytes = file
        .metadata()
        .map_err(|source| ArchiveError::Io {
            path: output_path.to_path_buf(),
            source,
        })?
        .len();

    Ok(ArchiveSummary {
        path: output_path.to_path_buf(),
        entries,
        bytes,
    })
}

fn add_file<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    name: &str,
    source_path: &Path,
    options: FileOptions,
) -> ArchiveResult<()> {
    let io_err = |source| ArchiveError::Io {
        path: source_path.to_path_buf(),
        source,
    };

    writer
        .start_file(name, options)
        .map_err(|source| ArchiveError::Zip {
            path: source_path.to_path_buf(),
            source,
        })?;
    let mut input = File::open(source_path).map_err(io_err)?;
    io::copy(&mut input, writer).map_err(io_err)?;
    Ok(())
}

/// Builds `<folder>/<a>/<b>` from a relative path, whatever the host separator.
fn entry_name(folder: &str, relative: &Path) -> String {
    let mut name = folder.to_string();
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}

/// True if `name` can be used as a single path component.
pub(crate) fn is_single_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
