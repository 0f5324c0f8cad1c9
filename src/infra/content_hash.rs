//! SHA-256 digests of delivered archives.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// SHA-256 of an archive's bytes, as a 64-character lowercase hex string.
///
/// Reported alongside every delivered archive so a download can be checked
/// against what the exporter produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash {
    hex: String,
}

impl ContentHash {
    /// Computes the hash of an in-memory byte slice.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self::from_digest(hasher)
    }

    /// Computes the hash of everything readable from `reader`.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)?;
        Ok(Self::from_digest(hasher))
    }

    /// Computes the hash of a file without loading it into memory.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    fn from_digest(hasher: Sha256) -> Self {
        Self {
            hex: format!("{:x}", hasher.finalize()),
        }
    }

    /// Returns the hash as a 64-character lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}
