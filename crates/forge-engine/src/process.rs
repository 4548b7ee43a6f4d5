//! Process bridge to the installed engine program.
//!
//! The engine runtime lives under the installation root and is not linked into
//! the hooks. [`ProcessEngine`] resolves its program once from
//! [`HookSettings`] and then runs it once per call.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use forge_core::{ExtractedFact, FactMetadata, QueryHit, StoreScope};
use forge_settings::HookSettings;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::errors::EngineError;
use crate::protocol::{
    EngineOp, IngestFileRequest, IngestTextRequest, MeaningfulResponse, QueryRequest,
    SyncMetaRequest, TextRequest,
};
use crate::traits::{KnowledgeEngine, QualityGates};

/// Engine client that shells out to the engine program.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ProcessEngine {
    /// Client for `program`, with no leading arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the operation name (e.g. a script path when
    /// `program` is an interpreter).
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Resolve the client from settings.
    ///
    /// Fails when no installation root is configured, or when an absolute
    /// program path does not exist.
    pub fn from_settings(settings: &HookSettings) -> Result<Self, EngineError> {
        let program = settings.engine_program().ok_or(EngineError::Unresolved)?;
        if program.is_absolute() && !program.exists() {
            return Err(EngineError::NotInstalled(program));
        }
        Ok(Self::new(program))
    }

    /// Program being run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run one operation and return its raw stdout.
    async fn run<R: Serialize + Sync>(&self, op: EngineOp, request: &R) -> Result<Vec<u8>, EngineError> {
        let payload =
            serde_json::to_vec(request).map_err(|source| EngineError::Protocol { op, source })?;

        debug!(program = %self.program.display(), %op, bytes = payload.len(), "invoking engine");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(op.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| EngineError::Spawn { op, source })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload).await {
                // An engine that does not need its input may exit before reading it.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(source) => return Err(EngineError::Spawn { op, source }),
                Ok(()) => {}
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| EngineError::Spawn { op, source })?;

        if !output.status.success() {
            return Err(EngineError::Failed {
                op,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(%op, bytes = output.stdout.len(), "engine completed");
        Ok(output.stdout)
    }

    /// Run one operation and decode its JSON response.
    async fn call<R, T>(&self, op: EngineOp, request: &R) -> Result<T, EngineError>
    where
        R: Serialize + Sync,
        T: DeserializeOwned,
    {
        let stdout = self.run(op, request).await?;
        serde_json::from_slice(&stdout).map_err(|source| EngineError::Protocol { op, source })
    }
}

#[async_trait]
impl KnowledgeEngine for ProcessEngine {
    async fn ingest_file(&self, path: &Path, scope: &StoreScope) -> Result<(), EngineError> {
        let request = IngestFileRequest {
            path,
            scope: scope.path(),
        };
        let _ = self.run(EngineOp::IngestFile, &request).await?;
        Ok(())
    }

    async fn ingest_text(
        &self,
        text: &str,
        metadata: &FactMetadata,
        scope: &StoreScope,
    ) -> Result<(), EngineError> {
        let request = IngestTextRequest {
            text,
            metadata,
            scope: scope.path(),
        };
        let _ = self.run(EngineOp::IngestText, &request).await?;
        Ok(())
    }

    async fn query(
        &self,
        prompt: &str,
        scope: &StoreScope,
        top_k: usize,
    ) -> Result<Vec<QueryHit>, EngineError> {
        let request = QueryRequest {
            prompt,
            scope: scope.path(),
            top_k,
        };
        self.call(EngineOp::Query, &request).await
    }

    async fn sync_to_meta(
        &self,
        project: &StoreScope,
        meta: &StoreScope,
    ) -> Result<(), EngineError> {
        let request = SyncMetaRequest {
            project: project.path(),
            meta: meta.path(),
        };
        let _ = self.run(EngineOp::SyncMeta, &request).await?;
        Ok(())
    }
}

#[async_trait]
impl QualityGates for ProcessEngine {
    async fn is_meaningful_session(&self, text: &str) -> Result<bool, EngineError> {
        let response: MeaningfulResponse =
            self.call(EngineOp::IsMeaningful, &TextRequest { text }).await?;
        Ok(response.meaningful)
    }

    async fn extract_facts(&self, text: &str) -> Result<Vec<ExtractedFact>, EngineError> {
        self.call(EngineOp::ExtractFacts, &TextRequest { text }).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use forge_core::{FactStatus, KnowledgeFact, SourceType};
    use tempfile::TempDir;

    /// Shell engine that records each request as `<dir>/<op>.json` and answers
    /// from canned responses.
    fn fake_engine(dir: &TempDir) -> ProcessEngine {
        let script = dir.path().join("engine.sh");
        let body = format!(
            r#"op="$1"
cat > "{dir}/$op.json"
case "$op" in
  query) printf '[{{"text":"alpha","score":0.5}},{{"text":"beta"}}]' ;;
  is-meaningful) printf '{{"meaningful": true}}' ;;
  extract-facts) printf '[{{"fact":"A","status":"confirmed"}},{{"fact":"B"}}]' ;;
  sync-meta) echo "meta store locked" >&2; exit 3 ;;
  *) ;;
esac
"#,
            dir = dir.path().display()
        );
        std::fs::write(&script, body).unwrap();
        ProcessEngine::new("/bin/sh").with_args([script])
    }

    fn recorded(dir: &TempDir, op: EngineOp) -> serde_json::Value {
        let raw = std::fs::read_to_string(dir.path().join(format!("{op}.json"))).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn ingest_text_sends_metadata_and_scope() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir);
        let fact = KnowledgeFact::new("use sqlite", FactStatus::Draft, SourceType::CompactionCapture);

        engine
            .ingest_fact(&fact, &StoreScope::project("/work/app"))
            .await
            .unwrap();

        let request = recorded(&dir, EngineOp::IngestText);
        assert_eq!(request["text"], "use sqlite");
        assert_eq!(request["scope"], "/work/app");
        assert_eq!(request["metadata"]["status"], "draft");
    }

    #[tokio::test]
    async fn ingest_file_sends_path() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir);

        engine
            .ingest_file(Path::new("/work/app/src/main.rs"), &StoreScope::project("/work/app"))
            .await
            .unwrap();

        let request = recorded(&dir, EngineOp::IngestFile);
        assert_eq!(request["path"], "/work/app/src/main.rs");
    }

    #[tokio::test]
    async fn query_decodes_hits_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir);

        let hits = engine
            .query("recent decisions and patterns", &StoreScope::project("/p"), 3)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "alpha");
        assert_eq!(hits[1].text, "beta");
        assert_eq!(recorded(&dir, EngineOp::Query)["top_k"], 3);
    }

    #[tokio::test]
    async fn gates_decode_responses() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir);

        assert!(engine.is_meaningful_session("transcript").await.unwrap());
        let facts = engine.extract_facts("transcript").await.unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[1].fact, "B");
        assert_eq!(facts[1].status(), FactStatus::Confirmed);
    }

    #[tokio::test]
    async fn non_zero_exit_is_failed_with_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let engine = fake_engine(&dir);

        let err = engine
            .sync_to_meta(&StoreScope::project("/p"), &StoreScope::meta("/m"))
            .await
            .unwrap_err();

        assert_matches!(
            err,
            EngineError::Failed { op: EngineOp::SyncMeta, code: Some(3), ref stderr }
                if stderr == "meta store locked"
        );
    }

    #[tokio::test]
    async fn empty_output_for_data_op_is_protocol_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("silent.sh");
        std::fs::write(&script, "cat > /dev/null\n").unwrap();
        let engine = ProcessEngine::new("/bin/sh").with_args([script]);

        let err = engine.query("q", &StoreScope::project("/p"), 1).await.unwrap_err();
        assert_matches!(err, EngineError::Protocol { op: EngineOp::Query, .. });
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let engine = ProcessEngine::new("/nonexistent/rag-engine");
        let err = engine.is_meaningful_session("x").await.unwrap_err();
        assert_matches!(err, EngineError::Spawn { op: EngineOp::IsMeaningful, .. });
    }

    #[test]
    fn from_settings_requires_install_root() {
        let err = ProcessEngine::from_settings(&HookSettings::default()).unwrap_err();
        assert_matches!(err, EngineError::Unresolved);
    }

    #[test]
    fn from_settings_rejects_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let settings = HookSettings {
            forge_home: Some(dir.path().to_path_buf()),
            ..HookSettings::default()
        };
        let err = ProcessEngine::from_settings(&settings).unwrap_err();
        assert_matches!(err, EngineError::NotInstalled(path) if path.ends_with("rag/bin/rag-engine"));
    }

    #[test]
    fn from_settings_uses_installed_program() {
        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("rag").join("bin").join("rag-engine");
        std::fs::create_dir_all(program.parent().unwrap()).unwrap();
        std::fs::write(&program, "").unwrap();
        let settings = HookSettings {
            forge_home: Some(dir.path().to_path_buf()),
            ..HookSettings::default()
        };

        let engine = ProcessEngine::from_settings(&settings).unwrap();
        assert_eq!(engine.program(), program);
    }
}
