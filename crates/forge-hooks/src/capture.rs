//! Post-edit capture.
//!
//! The foreground hook only decides whether an edit is worth indexing and
//! hands the file to a detached worker; it returns without waiting. The
//! worker ([`run_ingest_worker`]) does the slow `ingest_file` call.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use forge_engine::KnowledgeEngine;
use forge_settings::ProjectLayout;
use serde::Deserialize;
use tracing::{debug, info};

use crate::context::HookEnv;
use crate::errors::HookError;
use crate::types::{HookOutcome, SkipReason};

/// Extensions never ingested, lowercase and without the dot.
pub const SKIP_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "pdf", "zip", "tar", "gz", "lock", "lance", "bin", "exe", "so",
    "dylib",
];

/// Hidden subcommand the detached worker is launched with.
pub const INGEST_WORKER_COMMAND: &str = "ingest-worker";

/// Edit notification from the host.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EditEvent {
    /// Path of the edited or written file.
    #[serde(default)]
    pub file_path: Option<String>,
}

impl EditEvent {
    /// Parse a payload.
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Non-empty file path, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Path::new)
    }
}

/// Whether a file's extension allows ingestion. Case-insensitive; files
/// without an extension are ingestable.
#[must_use]
pub fn is_ingestable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_none_or(|ext| !SKIP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Starts the background ingest worker.
pub trait WorkerSpawner {
    /// Launch a worker that ingests `file` into the store of `project`.
    /// Must return without waiting for the worker.
    fn spawn_ingest(&self, file: &Path, project: &Path, forge_home: &Path) -> std::io::Result<()>;
}

/// Re-executes a program with the hidden worker subcommand, fully detached:
/// own process group, null stdio, never waited on.
#[derive(Clone, Debug)]
pub struct DetachedSpawner {
    program: PathBuf,
}

impl DetachedSpawner {
    /// Spawner re-executing `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Spawner re-executing the running binary.
    pub fn current_exe() -> std::io::Result<Self> {
        std::env::current_exe().map(Self::new)
    }

    /// Program that will be launched.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, file: &Path, project: &Path, forge_home: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        let _ = cmd
            .arg(INGEST_WORKER_COMMAND)
            .arg(file)
            .arg(project)
            .arg(forge_home)
            .current_dir(project)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            let _ = cmd.process_group(0);
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const DETACHED_PROCESS: u32 = 0x0000_0008;
            const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;
            let _ = cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
        }
        cmd
    }
}

impl WorkerSpawner for DetachedSpawner {
    fn spawn_ingest(&self, file: &Path, project: &Path, forge_home: &Path) -> std::io::Result<()> {
        let child = self.command(file, project, forge_home).spawn()?;
        debug!(pid = child.id(), file = %file.display(), "ingest worker detached");
        Ok(())
    }
}

/// Foreground half of post-edit capture.
pub struct CaptureTrigger<'a, S: WorkerSpawner> {
    env: &'a HookEnv,
    spawner: &'a S,
}

impl<'a, S: WorkerSpawner> CaptureTrigger<'a, S> {
    /// Trigger for one invocation.
    pub fn new(env: &'a HookEnv, spawner: &'a S) -> Self {
        Self { env, spawner }
    }

    /// Decide on `payload` and spawn the worker if the file qualifies.
    /// Returns the file handed to the worker.
    pub fn run(&self, payload: &str) -> Result<HookOutcome<PathBuf>, HookError> {
        let Ok(event) = EditEvent::parse(payload) else {
            return Ok(HookOutcome::Skipped(SkipReason::MalformedPayload));
        };
        let Some(file) = event.file_path() else {
            return Ok(HookOutcome::Skipped(SkipReason::EmptyFilePath));
        };
        let project = self.env.project();
        if !project.has_knowledge_dir() {
            return Ok(HookOutcome::Skipped(SkipReason::NoKnowledgeDir));
        }
        if !is_ingestable(file) {
            return Ok(HookOutcome::Skipped(SkipReason::NonIngestable));
        }
        let Some(install) = self.env.install() else {
            return Ok(HookOutcome::Skipped(SkipReason::NoInstallRoot));
        };

        let file = project.root().join(file);
        self.spawner
            .spawn_ingest(&file, project.root(), install.forge_home())
            .map_err(HookError::Spawn)?;
        Ok(HookOutcome::Completed(file))
    }
}

/// Background half of post-edit capture: index `file` into the project store.
pub async fn run_ingest_worker(
    engine: &dyn KnowledgeEngine,
    file: &Path,
    project: &ProjectLayout,
) -> Result<HookOutcome<PathBuf>, HookError> {
    engine.ingest_file(file, &project.scope()).await?;
    info!(path = %file.display(), "file ingested");
    Ok(HookOutcome::Completed(file.to_path_buf()))
}
