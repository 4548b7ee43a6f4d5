//! Structured logging with `tracing`.
//!
//! Hooks share the host session's terminal: stdout is reserved for the context
//! blocks and status lines the host reads back, so the subscriber installed
//! here writes to stderr only.
//!
//! - [`init_subscriber`] sets up the global stderr subscriber
//! - [`test_utils::capture_logs`] captures events in memory for assertions

pub mod test_utils;

pub use test_utils::{CapturedLogs, capture_logs};

/// Environment variable holding an `EnvFilter` directive for hook logging.
pub const LOG_FILTER_ENV: &str = "FORGE_RAG_LOG";

/// Initialize the global tracing subscriber with stderr output only.
///
/// Call once at startup. Subsequent calls are no-ops. The filter is read from
/// [`LOG_FILTER_ENV`] and falls back to `level`.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}
