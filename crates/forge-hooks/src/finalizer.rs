//! Session-end extraction.
//!
//! Gates the session text, ingests each extracted fact into the project
//! store, propagates confirmed facts to the meta store and appends one entry
//! to the session log.

use std::io::Write;

use forge_core::SourceType;
use forge_core::constants::OUTPUT_PREFIX;
use forge_engine::{KnowledgeEngine, QualityGates};
use forge_memory::{FactTally, SessionLog, SessionLogEntry};
use forge_settings::InstallLayout;
use tracing::{debug, info, warn};

use crate::context::HookEnv;
use crate::errors::HookError;
use crate::types::{HookOutcome, SkipReason};

/// Extracts and persists facts when a session ends.
pub struct SessionFinalizer<'a> {
    env: &'a HookEnv,
    engine: &'a dyn KnowledgeEngine,
    gates: &'a dyn QualityGates,
}

impl<'a> SessionFinalizer<'a> {
    /// Finalizer for one invocation.
    pub fn new(
        env: &'a HookEnv,
        engine: &'a dyn KnowledgeEngine,
        gates: &'a dyn QualityGates,
    ) -> Self {
        Self { env, engine, gates }
    }

    /// Process the session. `transcript` is the text piped in by the host;
    /// when empty, the project's session context file is used instead.
    pub async fn run<W: Write>(
        &self,
        transcript: &str,
        out: &mut W,
    ) -> Result<HookOutcome<SessionLogEntry>, HookError> {
        let install = match self.env.require_active() {
            Ok(install) => install,
            Err(reason) => return Ok(HookOutcome::Skipped(reason)),
        };
        let Some(text) = self.session_text(transcript)? else {
            return Ok(HookOutcome::Skipped(SkipReason::EmptyTranscript));
        };

        if !self.gates.is_meaningful_session(&text).await? {
            return Ok(HookOutcome::Skipped(SkipReason::NotMeaningful));
        }
        let extracted = self.gates.extract_facts(&text).await?;
        if extracted.is_empty() {
            return Ok(HookOutcome::Skipped(SkipReason::NoFacts));
        }

        let scope = self.env.project().scope();
        let mut tally = FactTally::default();
        for candidate in extracted {
            let fact = candidate.into_fact(SourceType::SessionExtraction);
            self.engine.ingest_fact(&fact, &scope).await?;
            tally.record(fact.status);
        }

        let meta_synced = tally.confirmed > 0 && self.sync_to_meta(install).await;
        let entry = SessionLogEntry::new(tally, meta_synced);
        SessionLog::new(self.env.project().session_log()).append(&entry)?;

        writeln!(
            out,
            "{OUTPUT_PREFIX} Session captured: {} facts",
            entry.facts_extracted()
        )?;
        info!(
            count = entry.facts_extracted(),
            confirmed = tally.confirmed,
            meta_synced,
            "session facts captured"
        );
        Ok(HookOutcome::Completed(entry))
    }

    fn session_text(&self, transcript: &str) -> Result<Option<String>, HookError> {
        if !transcript.is_empty() {
            return Ok(Some(transcript.to_string()));
        }
        let path = self.env.project().session_context();
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|source| HookError::Transcript { path: path.clone(), source })?;
        debug!(path = %path.display(), "using session context fallback");
        Ok(Some(text).filter(|t| !t.is_empty()))
    }

    /// Failure here is recorded in the log entry, never propagated.
    async fn sync_to_meta(&self, install: &InstallLayout) -> bool {
        match self
            .engine
            .sync_to_meta(&self.env.project().scope(), &install.meta_scope())
            .await
        {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, "meta store sync failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EngineCall, Fixture, MockEngine, RecordingEngine};
    use assert_matches::assert_matches;
    use forge_core::logging::capture_logs;
    use forge_core::{ExtractedFact, FactStatus, StoreKind, StoreScope};
    use forge_engine::EngineError;
    use tracing::Level;

    fn facts(items: &[(&str, Option<FactStatus>)]) -> Vec<ExtractedFact> {
        items
            .iter()
            .map(|(text, status)| ExtractedFact::new(*text, *status))
            .collect()
    }

    fn read_log(fx: &Fixture) -> String {
        std::fs::read_to_string(fx.project_root().join(".rag/session-log.md")).unwrap()
    }

    // --- happy path ---

    #[tokio::test]
    async fn missing_status_defaults_to_confirmed() {
        let fx = Fixture::active();
        let env = fx.env();
        let engine = RecordingEngine::new()
            .with_facts(facts(&[("A", Some(FactStatus::Confirmed)), ("B", None)]));
        let mut out = Vec::new();

        let outcome = SessionFinalizer::new(&env, &engine, &engine)
            .run("long session", &mut out)
            .await
            .unwrap();

        let HookOutcome::Completed(entry) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(entry.facts_extracted(), 2);
        assert_eq!(entry.tally.confirmed, 2);
        assert_eq!(entry.tally.draft, 0);
        assert_eq!(entry.tally.action_items, 0);
        assert!(entry.meta_synced);

        let ingested = engine.ingested_texts();
        assert_eq!(ingested.len(), 2);
        assert_eq!(ingested[1].0, "B");
        assert_eq!(ingested[1].1.status, FactStatus::Confirmed);
        assert!(ingested
            .iter()
            .all(|(_, m)| m.source_type == SourceType::SessionExtraction));

        assert_eq!(String::from_utf8(out).unwrap(), "[RAG] Session captured: 2 facts\n");
        let log = read_log(&fx);
        assert!(log.contains("- Facts extracted: 2\n"));
        assert!(log.contains("- Confirmed: 2, Draft: 0, Action items: 0\n"));
        assert!(log.contains("- Meta-RAG synced: yes\n"));
    }

    #[tokio::test]
    async fn sync_targets_install_meta_store() {
        let fx = Fixture::active();
        let env = fx.env();
        let engine = RecordingEngine::new().with_facts(facts(&[("A", None)]));
        let _ = SessionFinalizer::new(&env, &engine, &engine)
            .run("text", &mut Vec::new())
            .await
            .unwrap();

        let syncs: Vec<_> = engine
            .calls()
            .into_iter()
            .filter(|c| matches!(c, EngineCall::SyncMeta { .. }))
            .collect();
        assert_eq!(
            syncs,
            vec![EngineCall::SyncMeta {
                project: StoreScope::project(fx.project_root()),
                meta: StoreScope::meta(fx.forge_home().join("rag").join("meta")),
            }]
        );
    }

    #[tokio::test]
    async fn no_confirmed_facts_skips_sync() {
        let fx = Fixture::active();
        let env = fx.env();
        let engine = RecordingEngine::new().with_facts(facts(&[
            ("maybe use redis", Some(FactStatus::Draft)),
            ("write migration", Some(FactStatus::ActionItem)),
        ]));
        let outcome = SessionFinalizer::new(&env, &engine, &engine)
            .run("text", &mut Vec::new())
            .await
            .unwrap();

        let HookOutcome::Completed(entry) = outcome else {
            panic!("expected completion");
        };
        assert!(!entry.meta_synced);
        assert!(!engine
            .calls()
            .iter()
            .any(|c| matches!(c, EngineCall::SyncMeta { .. })));
        assert!(read_log(&fx).contains("- Confirmed: 0, Draft: 1, Action items: 1\n"));
    }

    #[tokio::test]
    async fn log_entries_accumulate() {
        let fx = Fixture::active();
        let env = fx.env();
        let engine = RecordingEngine::new().with_facts(facts(&[("A", None)]));
        for _ in 0..2 {
            let _ = SessionFinalizer::new(&env, &engine, &engine)
                .run("text", &mut Vec::new())
                .await
                .unwrap();
        }
        assert_eq!(read_log(&fx).matches("## Session ").count(), 2);
    }

    // --- meta sync failure ---

    #[tokio::test]
    async fn failing_sync_is_recorded_not_propagated() {
        let fx = Fixture::active();
        let env = fx.env();
        let gates = RecordingEngine::new().with_facts(facts(&[("A", Some(FactStatus::Confirmed))]));

        let mut engine = MockEngine::new();
        engine.expect_ingest_text().times(1).returning(|_, _, _| Ok(()));
        engine
            .expect_sync_to_meta()
            .withf(|project, meta| {
                project.kind() == StoreKind::Project && meta.kind() == StoreKind::Meta
            })
            .times(1)
            .returning(|_, _| Err(EngineError::Internal("meta store locked".into())));

        let (logs, _guard) = capture_logs();
        let mut out = Vec::new();
        let outcome = SessionFinalizer::new(&env, &engine, &gates)
            .run("text", &mut out)
            .await
            .unwrap();

        let HookOutcome::Completed(entry) = outcome else {
            panic!("expected completion");
        };
        assert!(!entry.meta_synced);
        assert!(read_log(&fx).contains("- Meta-RAG synced: no\n"));
        assert_eq!(String::from_utf8(out).unwrap(), "[RAG] Session captured: 1 facts\n");
        assert!(logs.has_event(Level::WARN, "meta store sync failed"));
    }

    #[tokio::test]
    async fn ingest_failure_propagates_without_log_entry() {
        let fx = Fixture::active();
        let env = fx.env();
        let gates = RecordingEngine::new().with_facts(facts(&[("A", None)]));

        let mut engine = MockEngine::new();
        engine
            .expect_ingest_text()
            .times(1)
            .returning(|_, _, _| Err(EngineError::Internal("disk full".into())));
        engine.expect_sync_to_meta().never();

        let err = SessionFinalizer::new(&env, &engine, &gates)
            .run("text", &mut Vec::new())
            .await
            .unwrap_err();
        assert_matches!(err, HookError::Engine(_));
        assert!(!fx.project_root().join(".rag/session-log.md").exists());
    }

    // --- gates and input ---

    #[tokio::test]
    async fn not_meaningful_stops_silently() {
        let fx = Fixture::active();
        let env = fx.env();
        let engine = RecordingEngine::new()
            .not_meaningful()
            .with_facts(facts(&[("A", None)]));
        let mut out = Vec::new();
        let outcome = SessionFinalizer::new(&env, &engine, &engine)
            .run("hi", &mut out)
            .await
            .unwrap();
        assert_eq!(outcome.skip_reason(), Some(SkipReason::NotMeaningful));
        assert_eq!(engine.gate_calls(), 1);
        assert!(engine.calls().is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn no_facts_stops_silently() {
        let fx = Fixture::active();
        let env = fx.env();
        let engine = RecordingEngine::new();
        let outcome = SessionFinalizer::new(&env, &engine, &engine)
            .run("text", &mut Vec::new())
            .await
            .unwrap();
        assert_eq!(outcome.skip_reason(), Some(SkipReason::NoFacts));
        assert!(!fx.project_root().join(".rag/session-log.md").exists());
    }

    #[tokio::test]
    async fn falls_back_to_session_context_file() {
        let fx = Fixture::active();
        std::fs::create_dir(fx.project_root().join(".claude")).unwrap();
        std::fs::write(
            fx.project_root().join(".claude/session-context.md"),
            "we settled on postgres",
        )
        .unwrap();
        let env = fx.env();
        let engine = RecordingEngine::new().with_facts(facts(&[("postgres", None)]));
        let outcome = SessionFinalizer::new(&env, &engine, &engine)
            .run("", &mut Vec::new())
            .await
            .unwrap();
        assert!(outcome.is_completed());
    }

    #[tokio::test]
    async fn no_text_anywhere_is_skipped() {
        let fx = Fixture::active();
        let env = fx.env();
        let engine = RecordingEngine::new().with_facts(facts(&[("A", None)]));
        let outcome = SessionFinalizer::new(&env, &engine, &engine)
            .run("", &mut Vec::new())
            .await
            .unwrap();
        assert_eq!(outcome.skip_reason(), Some(SkipReason::EmptyTranscript));
        assert_eq!(engine.gate_calls(), 0);
    }

    #[tokio::test]
    async fn inactive_project_is_skipped() {
        let fx = Fixture::bare();
        let env = fx.env();
        let engine = RecordingEngine::new().with_facts(facts(&[("A", None)]));
        let outcome = SessionFinalizer::new(&env, &engine, &engine)
            .run("text", &mut Vec::new())
            .await
            .unwrap();
        assert_eq!(outcome.skip_reason(), Some(SkipReason::NoKnowledgeDir));
        assert_eq!(engine.gate_calls(), 0);
    }
}
