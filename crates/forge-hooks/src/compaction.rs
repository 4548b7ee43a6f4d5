//! Pre-compaction capture.
//!
//! Scans the transcript for decisions and action items and persists them as
//! one `draft` fact before the host compresses its history.

use std::io::Write;

use forge_core::constants::OUTPUT_PREFIX;
use forge_core::{FactStatus, KnowledgeFact, SourceType};
use forge_engine::KnowledgeEngine;
use forge_memory::CaptureSummary;
use tracing::info;

use crate::context::HookEnv;
use crate::errors::HookError;
use crate::types::{HookOutcome, SkipReason};

/// Persists decision and action-item lines before compaction.
pub struct CompactionCapture<'a> {
    env: &'a HookEnv,
    engine: &'a dyn KnowledgeEngine,
}

impl<'a> CompactionCapture<'a> {
    /// Capture for one invocation.
    pub fn new(env: &'a HookEnv, engine: &'a dyn KnowledgeEngine) -> Self {
        Self { env, engine }
    }

    /// Summarise `transcript`, ingest the summary and report to `out`.
    pub async fn run<W: Write>(
        &self,
        transcript: &str,
        out: &mut W,
    ) -> Result<HookOutcome<CaptureSummary>, HookError> {
        if let Err(reason) = self.env.require_active() {
            return Ok(HookOutcome::Skipped(reason));
        }
        if transcript.is_empty() {
            return Ok(HookOutcome::Skipped(SkipReason::EmptyTranscript));
        }
        let Some(summary) = CaptureSummary::from_transcript(transcript) else {
            return Ok(HookOutcome::Skipped(SkipReason::NothingMatched));
        };

        let fact = KnowledgeFact::new(
            summary.render(),
            FactStatus::Draft,
            SourceType::CompactionCapture,
        );
        self.engine
            .ingest_fact(&fact, &self.env.project().scope())
            .await?;

        writeln!(
            out,
            "{OUTPUT_PREFIX} Captured {} decisions/actions before compaction",
            summary.matched()
        )?;
        info!(
            count = summary.matched(),
            decisions = summary.decisions().len(),
            actions = summary.actions().len(),
            "compaction capture ingested"
        );
        Ok(HookOutcome::Completed(summary))
    }
}
