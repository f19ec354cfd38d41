//! Errors raised while persisting an archive.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Hard failures that abort archival of a single pull request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArchiveError {
    /// The archive store could not be opened or written.
    #[error("archive store error at {path}: {message}")]
    Store {
        /// Path of the directory or file involved.
        path: Utf8PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
    /// The blocking delivery task panicked or was cancelled.
    #[error("archive delivery task failed: {message}")]
    Delivery {
        /// Join error text.
        message: String,
    },
}

impl ArchiveError {
    pub(crate) fn store(path: impl Into<Utf8PathBuf>, error: &std::io::Error) -> Self {
        Self::Store {
            path: path.into(),
            message: error.to_string(),
        }
    }
}
