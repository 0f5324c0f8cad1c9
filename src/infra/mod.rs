//! Filesystem plumbing: staging trees, digests

mod content_hash;
mod staging;

pub use content_hash::ContentHash;
pub use staging::{CleanupFailure, CleanupReport, STAGING_PREFIX, StagingError, StagingTree};
