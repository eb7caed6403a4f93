//! Error types for key-value persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors during store reads and writes.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read store file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} does not contain a valid record")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record")]
    Encode(#[source] serde_json::Error),
}
