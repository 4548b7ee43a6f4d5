//! # forge-hooks
//!
//! Lifecycle hooks that capture project knowledge and re-inject it.
//!
//! Each hook is an independent one-shot invocation fired by the host tool:
//! - [`PostToolUse`](types::HookType::PostToolUse) → [`CaptureTrigger`]:
//!   detaches a worker that ingests the edited file
//! - [`PreCompact`](types::HookType::PreCompact) → [`CompactionCapture`]:
//!   persists decisions and action items before history is compressed
//! - [`SessionEnd`](types::HookType::SessionEnd) → [`SessionFinalizer`]:
//!   extracts facts, syncs confirmed ones to the meta store, appends the
//!   session log
//! - [`SessionStart`](types::HookType::SessionStart) → [`ContextInjector`]:
//!   prints prior knowledge, throttling the cross-project query
//!
//! ## Fail-Silent
//!
//! Absence conditions (no `.rag/`, no installation root, empty input) are
//! [`HookOutcome::Skipped`], not errors. Everything else propagates with `?`
//! up to [`run_fail_silent`], the single boundary that logs and swallows
//! errors and panics. The host never sees a failure.

#![deny(unsafe_code)]

pub mod boundary;
pub mod capture;
pub mod compaction;
pub mod context;
pub mod errors;
pub mod finalizer;
pub mod injector;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use boundary::run_fail_silent;
pub use capture::{CaptureTrigger, DetachedSpawner, EditEvent, WorkerSpawner, run_ingest_worker};
pub use compaction::CompactionCapture;
pub use context::HookEnv;
pub use errors::HookError;
pub use finalizer::SessionFinalizer;
pub use injector::{ContextInjector, InjectionReport, MetaQuery};
pub use types::{HookOutcome, HookType, SkipReason};
