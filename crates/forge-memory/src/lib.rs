//! # forge-memory
//!
//! Everything the hooks remember outside the knowledge store itself.
//!
//! - [`classify`]: fixed-vocabulary decision/action line classifier
//! - [`CaptureSummary`]: condensed pre-compaction summary
//! - [`FactTally`] / [`SessionLogEntry`] / [`SessionLog`]: append-only
//!   per-session audit trail in `.rag/session-log.md`
//! - [`ThrottleMarker`]: mtime-only freshness gate for meta-store queries
//!
//! ## Artifact lifecycle
//!
//! The throttle marker is created on first touch and only ever has its mtime
//! bumped. The session log is opened in append mode and never truncated or
//! rewritten. Neither is locked: overlapping hook invocations for the same
//! project may interleave, and the last writer's mtime wins.

#![deny(unsafe_code)]

pub mod capture;
pub mod classify;
pub mod errors;
pub mod session_log;
pub mod throttle;

pub use capture::{CaptureSummary, MAX_ACTIONS, MAX_DECISIONS};
pub use classify::{LineClass, classify_line};
pub use errors::MemoryError;
pub use session_log::{FactTally, SessionLog, SessionLogEntry};
pub use throttle::{META_QUERY_WINDOW, ThrottleMarker};
