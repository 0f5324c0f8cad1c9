//! Test fixture utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Returns the path to the fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Returns the path to a conversion fixture by file name.
pub fn convert_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("convert").join(name)
}

/// Reads a fixture file and returns its contents as a string.
///
/// # Panics
///
/// Panics if the file cannot be read.
pub fn read_fixture(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Reads every entry of a zip archive as (name, text) pairs in archive order.
///
/// # Panics
///
/// Panics if the bytes are not a valid zip or an entry is not UTF-8.
pub fn zip_entries(bytes: &[u8]) -> Vec<(String, String)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip archive");
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).expect("zip entry");
            let mut text = String::new();
            file.read_to_string(&mut text).expect("UTF-8 entry");
            (file.name().to_string(), text)
        })
        .collect()
}
