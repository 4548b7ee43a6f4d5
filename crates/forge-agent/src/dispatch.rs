//! Routes a parsed command to its hook, each inside the fail-silent boundary.

use std::io::Write;
use std::path::{Path, PathBuf};

use forge_engine::{EngineError, ProcessEngine};
use forge_hooks::{
    CaptureTrigger, CompactionCapture, ContextInjector, DetachedSpawner, HookEnv, HookError,
    HookOutcome, SessionFinalizer, SkipReason, run_fail_silent, run_ingest_worker,
};
use forge_settings::{HookSettings, ProjectLayout};

use crate::cli::Command;

/// Run `command` for `project_dir`. `transcript` is the text piped in by the
/// host (empty for hooks that do not read one). Output for the host session
/// goes to `out`. Never fails.
pub async fn dispatch<W: Write>(
    command: Command,
    project_dir: PathBuf,
    settings: &HookSettings,
    transcript: &str,
    out: &mut W,
) {
    let hook = command.hook_type();
    let env = HookEnv::from_settings(project_dir, settings);

    match command {
        Command::PostWrite { payload } => {
            let _ = run_fail_silent(hook, async {
                let spawner = DetachedSpawner::current_exe().map_err(HookError::Spawn)?;
                CaptureTrigger::new(&env, &spawner).run(&payload)
            })
            .await;
        }
        Command::PreCompact => {
            let _ = run_fail_silent(hook, async {
                let engine = match active_engine(&env, settings) {
                    Ok(engine) => engine?,
                    Err(reason) => return Ok(HookOutcome::Skipped(reason)),
                };
                CompactionCapture::new(&env, &engine).run(transcript, out).await
            })
            .await;
        }
        Command::SessionEnd => {
            let _ = run_fail_silent(hook, async {
                let engine = match active_engine(&env, settings) {
                    Ok(engine) => engine?,
                    Err(reason) => return Ok(HookOutcome::Skipped(reason)),
                };
                SessionFinalizer::new(&env, &engine, &engine)
                    .run(transcript, out)
                    .await
            })
            .await;
        }
        Command::SessionStart => {
            let _ = run_fail_silent(hook, async {
                let engine = match active_engine(&env, settings) {
                    Ok(Ok(engine)) => engine,
                    Ok(Err(error)) => return ContextInjector::engine_unavailable(&env, error),
                    Err(reason) => return Ok(HookOutcome::Skipped(reason)),
                };
                ContextInjector::new(&env, &engine).run(out).await
            })
            .await;
        }
        Command::IngestWorker {
            file,
            project,
            forge_home,
        } => {
            let settings = worker_settings(settings, forge_home);
            let _ = run_fail_silent(hook, async {
                let engine = ProcessEngine::from_settings(&settings)?;
                run_ingest_worker(&engine, &file, &ProjectLayout::new(project)).await
            })
            .await;
        }
    }
}

/// Engine for a project that passed the shared preconditions. The engine is
/// only resolved once the hook is known to have work to do.
fn active_engine(
    env: &HookEnv,
    settings: &HookSettings,
) -> Result<Result<ProcessEngine, EngineError>, SkipReason> {
    let _ = env.require_active()?;
    Ok(ProcessEngine::from_settings(settings))
}

/// Settings for the detached worker: the installation root it was launched
/// with wins over whatever the environment resolves.
fn worker_settings(settings: &HookSettings, forge_home: PathBuf) -> HookSettings {
    HookSettings {
        forge_home: Some(forge_home),
        ..settings.clone()
    }
}

/// Project directory from the command line, else the working directory.
pub fn project_dir(explicit: Option<&Path>) -> std::io::Result<PathBuf> {
    match explicit {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir(),
    }
}
