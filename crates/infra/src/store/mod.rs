//! Durable record storage.
//!
//! Only one backend exists (JSON files), so storage is a concrete type generic over
//! the record it holds rather than a trait.

pub mod json_file;

pub use json_file::JsonFileStore;

use std::path::PathBuf;

/// Storage error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start persist worker: {0}")]
    Worker(#[source] std::io::Error),
}

impl StoreError {
    /// True when the record file does not exist.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
