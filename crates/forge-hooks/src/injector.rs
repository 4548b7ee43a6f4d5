//! Session-start context injection.
//!
//! Prints the top project facts, and cross-project patterns when the meta
//! store exists and was not queried within the throttle window. The marker
//! is refreshed on every run of an active project, whether or not the
//! engine could be started or a query succeeded.

use std::io::Write;
use std::time::SystemTime;

use forge_core::QueryHit;
use forge_engine::{EngineError, KnowledgeEngine};
use forge_memory::ThrottleMarker;
use forge_settings::InstallLayout;
use tracing::debug;

use crate::context::HookEnv;
use crate::errors::HookError;
use crate::types::HookOutcome;

/// Prompt for the project store query.
pub const PROJECT_PROMPT: &str = "recent decisions and patterns";
/// Hits requested from the project store.
pub const PROJECT_TOP_K: usize = 3;
/// Prompt for the meta store query.
pub const META_PROMPT: &str = "patterns and best practices";
/// Hits requested from the meta store.
pub const META_TOP_K: usize = 2;
/// Characters of each hit shown to the session.
pub const PREVIEW_CHARS: usize = 150;

/// What happened to the cross-project query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaQuery {
    /// Skipped: the marker was inside the throttle window.
    Throttled,
    /// Skipped: no meta store has been persisted yet.
    Unavailable,
    /// Ran and returned this many hits.
    Queried(usize),
}

/// Summary of one injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectionReport {
    /// Project hits printed.
    pub project_hits: usize,
    /// Meta query result.
    pub meta: MetaQuery,
}

/// Prints prior knowledge at session start.
pub struct ContextInjector<'a> {
    env: &'a HookEnv,
    engine: &'a dyn KnowledgeEngine,
}

impl<'a> ContextInjector<'a> {
    /// Injector for one invocation.
    pub fn new(env: &'a HookEnv, engine: &'a dyn KnowledgeEngine) -> Self {
        Self { env, engine }
    }

    /// Query the stores and print what they return to `out`.
    pub async fn run<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<HookOutcome<InjectionReport>, HookError> {
        self.run_at(SystemTime::now(), out).await
    }

    /// [`run`](Self::run) with the throttle evaluated against `now`.
    pub async fn run_at<W: Write>(
        &self,
        now: SystemTime,
        out: &mut W,
    ) -> Result<HookOutcome<InjectionReport>, HookError> {
        let install = match self.env.require_active() {
            Ok(install) => install,
            Err(reason) => return Ok(HookOutcome::Skipped(reason)),
        };

        let marker = ThrottleMarker::new(self.env.project().throttle_marker());
        let throttled = marker.is_fresh(now);
        if throttled {
            debug!(path = %marker.path().display(), "meta query throttled");
        }

        let report = self.inject(install, throttled, out).await;
        let touched = marker.touch();
        let report = report?;
        touched?;
        Ok(HookOutcome::Completed(report))
    }

    /// Fail an active project's run whose engine could not be started. The
    /// marker is still refreshed; `error` is returned either way.
    pub fn engine_unavailable(
        env: &HookEnv,
        error: EngineError,
    ) -> Result<HookOutcome<InjectionReport>, HookError> {
        if env.require_active().is_ok() {
            let marker = ThrottleMarker::new(env.project().throttle_marker());
            if let Err(touch) = marker.touch() {
                debug!(error = %touch, "throttle marker refresh failed");
            }
        }
        Err(error.into())
    }

    async fn inject<W: Write>(
        &self,
        install: &InstallLayout,
        throttled: bool,
        out: &mut W,
    ) -> Result<InjectionReport, HookError> {
        let project_hits = self
            .engine
            .query(PROJECT_PROMPT, &self.env.project().scope(), PROJECT_TOP_K)
            .await?;
        if !project_hits.is_empty() {
            writeln!(out, "[RAG Context]")?;
            writeln!(out, "Project knowledge:")?;
            write_hits(out, &project_hits)?;
        }

        let meta = if throttled {
            MetaQuery::Throttled
        } else if !install.has_meta_store() {
            MetaQuery::Unavailable
        } else {
            let hits = self
                .engine
                .query(META_PROMPT, &install.meta_scope(), META_TOP_K)
                .await?;
            if !hits.is_empty() {
                writeln!(out, "Cross-project patterns:")?;
                write_hits(out, &hits)?;
            }
            MetaQuery::Queried(hits.len())
        };

        Ok(InjectionReport {
            project_hits: project_hits.len(),
            meta,
        })
    }
}

fn write_hits<W: Write>(out: &mut W, hits: &[QueryHit]) -> std::io::Result<()> {
    for hit in hits {
        writeln!(out, "  - {}", hit.preview(PREVIEW_CHARS))?;
    }
    Ok(())
}
