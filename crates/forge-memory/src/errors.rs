//! Memory artifact error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors touching the session log or throttle marker.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Filesystem operation on an artifact failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What was being done (e.g. "append session log").
        action: &'static str,
        /// Artifact path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl MemoryError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
