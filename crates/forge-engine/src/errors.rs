//! Engine error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::protocol::EngineOp;

/// Errors surfaced by a knowledge engine client.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No engine program could be resolved from settings.
    #[error("engine program unresolved: installation root not configured")]
    Unresolved,

    /// The resolved engine program does not exist.
    #[error("engine not installed at {}", .0.display())]
    NotInstalled(PathBuf),

    /// The engine process could not be started or waited on.
    #[error("failed to run engine for {op}: {source}")]
    Spawn {
        /// Operation being attempted.
        op: EngineOp,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The engine exited unsuccessfully.
    #[error("engine {op} exited with status {code:?}: {stderr}")]
    Failed {
        /// Operation that failed.
        op: EngineOp,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured stderr (trimmed).
        stderr: String,
    },

    /// Request encoding or response decoding failed.
    #[error("engine {op} protocol error: {source}")]
    Protocol {
        /// Operation being attempted.
        op: EngineOp,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Failure reported by an in-process engine implementation.
    #[error("{0}")]
    Internal(String),
}
