//! Hook error types.

use std::path::PathBuf;

use forge_engine::EngineError;
use forge_memory::MemoryError;
use thiserror::Error;

/// Errors that escape a hook's logic and reach the fail-silent boundary.
#[derive(Debug, Error)]
pub enum HookError {
    /// A knowledge engine call failed.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// The session log or throttle marker could not be written.
    #[error("{0}")]
    Memory(#[from] MemoryError),

    /// The session context fallback could not be read.
    #[error("failed to read session context {}: {source}", .path.display())]
    Transcript {
        /// Fallback file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The background ingest worker could not be started.
    #[error("failed to spawn ingest worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// Writing to the session output failed.
    #[error("failed to write hook output: {0}")]
    Output(#[from] std::io::Error),

    /// The hook panicked.
    #[error("hook panicked: {0}")]
    Panicked(String),
}
