//! Errors raised inside the JSON file record store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ports::StorePersistenceError;

/// Failures of the record store. None of them terminate the process.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or creating the backing file failed.
    #[error("record store i/o failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file exists but is not a valid store document.
    #[error("record store document {} is malformed: {message}", .path.display())]
    Malformed { path: PathBuf, message: String },
    /// The in-memory document could not be serialised.
    #[error("record store document could not be serialised: {0}")]
    Serialise(#[from] serde_json::Error),
    /// A previous holder of the store lock panicked.
    #[error("record store lock poisoned")]
    Poisoned,
    /// The blocking task running the store operation failed.
    #[error("record store task failed: {message}")]
    Join { message: String },
    /// An id counter reached its maximum.
    #[error("record store ran out of {collection} ids")]
    Exhausted { collection: &'static str },
    /// The configured path does not name a file.
    #[error("record store path {} does not name a file", .path.display())]
    InvalidPath { path: PathBuf },
}

impl From<StoreError> for StorePersistenceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io { .. } | StoreError::InvalidPath { .. } => Self::io(err.to_string()),
            StoreError::Malformed { .. } => Self::malformed(err.to_string()),
            StoreError::Serialise(_) | StoreError::Exhausted { .. } => Self::io(err.to_string()),
            StoreError::Poisoned | StoreError::Join { .. } => Self::unavailable(err.to_string()),
        }
    }
}
