//! Shared test doubles.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use forge_core::{ExtractedFact, FactMetadata, QueryHit, StoreKind, StoreScope};
use forge_engine::{EngineError, KnowledgeEngine, QualityGates};
use forge_settings::{InstallLayout, ProjectLayout};

use crate::context::HookEnv;

/// One call seen by [`RecordingEngine`].
#[derive(Clone, Debug, PartialEq)]
pub enum EngineCall {
    IngestFile { path: PathBuf, scope: StoreScope },
    IngestText { text: String, metadata: FactMetadata, scope: StoreScope },
    Query { prompt: String, scope: StoreScope, top_k: usize },
    SyncMeta { project: StoreScope, meta: StoreScope },
}

/// Engine fake that records every call and answers from canned data.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
    project_hits: Vec<QueryHit>,
    meta_hits: Vec<QueryHit>,
    fail_queries: bool,
    meaningful: bool,
    facts: Vec<ExtractedFact>,
    gate_calls: AtomicUsize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            meaningful: true,
            ..Self::default()
        }
    }

    pub fn with_project_hits(mut self, hits: &[&str]) -> Self {
        self.project_hits = hits.iter().map(|t| QueryHit::new(*t)).collect();
        self
    }

    pub fn with_meta_hits(mut self, hits: &[&str]) -> Self {
        self.meta_hits = hits.iter().map(|t| QueryHit::new(*t)).collect();
        self
    }

    pub fn failing_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn not_meaningful(mut self) -> Self {
        self.meaningful = false;
        self
    }

    pub fn with_facts(mut self, facts: Vec<ExtractedFact>) -> Self {
        self.facts = facts;
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn gate_calls(&self) -> usize {
        self.gate_calls.load(Ordering::SeqCst)
    }

    pub fn queries_against(&self, kind: StoreKind) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, EngineCall::Query { scope, .. } if scope.kind() == kind))
            .count()
    }

    pub fn ingested_texts(&self) -> Vec<(String, FactMetadata)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                EngineCall::IngestText { text, metadata, .. } => Some((text, metadata)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl KnowledgeEngine for RecordingEngine {
    async fn ingest_file(&self, path: &Path, scope: &StoreScope) -> Result<(), EngineError> {
        self.record(EngineCall::IngestFile {
            path: path.to_path_buf(),
            scope: scope.clone(),
        });
        Ok(())
    }

    async fn ingest_text(
        &self,
        text: &str,
        metadata: &FactMetadata,
        scope: &StoreScope,
    ) -> Result<(), EngineError> {
        self.record(EngineCall::IngestText {
            text: text.to_string(),
            metadata: metadata.clone(),
            scope: scope.clone(),
        });
        Ok(())
    }

    async fn query(
        &self,
        prompt: &str,
        scope: &StoreScope,
        top_k: usize,
    ) -> Result<Vec<QueryHit>, EngineError> {
        self.record(EngineCall::Query {
            prompt: prompt.to_string(),
            scope: scope.clone(),
            top_k,
        });
        if self.fail_queries {
            return Err(EngineError::Internal("index unavailable".into()));
        }
        let hits = match scope.kind() {
            StoreKind::Project => &self.project_hits,
            StoreKind::Meta => &self.meta_hits,
        };
        Ok(hits.iter().take(top_k).cloned().collect())
    }

    async fn sync_to_meta(
        &self,
        project: &StoreScope,
        meta: &StoreScope,
    ) -> Result<(), EngineError> {
        self.record(EngineCall::SyncMeta {
            project: project.clone(),
            meta: meta.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl QualityGates for RecordingEngine {
    async fn is_meaningful_session(&self, _text: &str) -> Result<bool, EngineError> {
        let _ = self.gate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.meaningful)
    }

    async fn extract_facts(&self, _text: &str) -> Result<Vec<ExtractedFact>, EngineError> {
        let _ = self.gate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.facts.clone())
    }
}

mockall::mock! {
    pub Engine {}

    #[async_trait]
    impl KnowledgeEngine for Engine {
        async fn ingest_file(&self, path: &Path, scope: &StoreScope) -> Result<(), EngineError>;
        async fn ingest_text(
            &self,
            text: &str,
            metadata: &FactMetadata,
            scope: &StoreScope,
        ) -> Result<(), EngineError>;
        async fn query(
            &self,
            prompt: &str,
            scope: &StoreScope,
            top_k: usize,
        ) -> Result<Vec<QueryHit>, EngineError>;
        async fn sync_to_meta(
            &self,
            project: &StoreScope,
            meta: &StoreScope,
        ) -> Result<(), EngineError>;
    }
}

/// Temp project plus installation root, both on disk.
pub struct Fixture {
    pub dir: tempfile::TempDir,
}

impl Fixture {
    /// Project with `.rag/` and a resolved installation root.
    pub fn active() -> Self {
        let fixture = Self::bare();
        std::fs::create_dir(fixture.project_root().join(".rag")).unwrap();
        fixture
    }

    /// Project without `.rag/`.
    pub fn bare() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("project")).unwrap();
        std::fs::create_dir(dir.path().join("home")).unwrap();
        Self { dir }
    }

    pub fn project_root(&self) -> PathBuf {
        self.dir.path().join("project")
    }

    pub fn forge_home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// Create `<home>/rag/meta/.lance`.
    pub fn with_meta_store(self) -> Self {
        let meta = self.forge_home().join("rag").join("meta").join(".lance");
        std::fs::create_dir_all(meta).unwrap();
        self
    }

    pub fn env(&self) -> HookEnv {
        HookEnv::new(
            ProjectLayout::new(self.project_root()),
            Some(InstallLayout::new(self.forge_home())),
        )
    }

    pub fn env_without_install(&self) -> HookEnv {
        HookEnv::new(ProjectLayout::new(self.project_root()), None)
    }
}
