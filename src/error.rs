//! Error types for the entry store and line cache.
//!
//! # Error Handling Strategy
//!
//! Every variant here is fatal to the daemon: storage is a local filesystem, so
//! failures are treated as non-transient and never retried. Rejected input is
//! not an error and is reported through [`crate::store::InsertOutcome`].
//!
//! The glue layers (`clipboard`, `daemon`, `cli`) use `anyhow` and wrap these
//! errors with context before they reach the user.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the entry store and the line cache writer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage directory is missing or cannot be read.
    #[error("storage unavailable: {}: {source}", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An entry file or the index could not be created, written, renamed or removed.
    #[error("write failed: {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Restrictive permissions could not be applied to a new entry file.
    #[error("cannot restrict permissions: {}: {source}", path.display())]
    PermissionFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StorageUnavailable { path: path.into(), source }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WriteFailure { path: path.into(), source }
    }

    pub(crate) fn permission(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::PermissionFailure { path: path.into(), source }
    }

    /// Path of the file or directory the failure refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::StorageUnavailable { path, .. }
            | Self::WriteFailure { path, .. }
            | Self::PermissionFailure { path, .. } => path,
        }
    }
}
