//! Error taxonomy shared by the reader, the exporter and their adapters.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a read or an export. None of them are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The store refused read access.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The store could not be opened or queried at all.
    #[error("message store unavailable: {0}")]
    SourceUnavailable(String),

    /// The export directory is missing, not a directory, or not writable.
    #[error("destination unavailable: {}: {reason}", path.display())]
    DestinationUnavailable { path: PathBuf, reason: String },

    /// A write or flush failed after the export file was opened.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
