//! Snapshot storage error types.

use std::path::PathBuf;

use crate::transport::TransportError;

/// Errors from saving or loading a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Reading, writing or creating directories failed
    #[error("snapshot file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not a valid snapshot document
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot parsed but its tables disagree
    #[error(transparent)]
    Transport(#[from] TransportError),
}
