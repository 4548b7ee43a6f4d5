//! Command-line surface of `forge-rag-hook`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use forge_hooks::HookType;

/// Knowledge capture and injection hooks.
#[derive(Parser, Debug)]
#[command(name = "forge-rag-hook", version, about = "Knowledge capture and injection hooks")]
pub struct Cli {
    /// Project directory the hook runs in. Defaults to the working directory.
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Hook to run.
    #[command(subcommand)]
    pub command: Command,
}

/// One hook invocation.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Index an edited file in the background.
    PostWrite {
        /// Edit event JSON with a `file_path` field.
        #[arg(long, env = "TOOL_INPUT", default_value = "", hide_env_values = true)]
        payload: String,
    },
    /// Capture decisions and action items from the transcript on stdin.
    PreCompact,
    /// Extract facts from the finished session.
    SessionEnd,
    /// Print prior project and cross-project knowledge.
    SessionStart,
    /// Ingest one file; launched detached by `post-write`.
    #[command(hide = true)]
    IngestWorker {
        /// File to ingest.
        file: PathBuf,
        /// Project whose store receives the file.
        project: PathBuf,
        /// Installation root.
        forge_home: PathBuf,
    },
}

impl Command {
    /// Lifecycle point this command serves.
    #[must_use]
    pub fn hook_type(&self) -> HookType {
        match self {
            Self::PostWrite { .. } | Self::IngestWorker { .. } => HookType::PostToolUse,
            Self::PreCompact => HookType::PreCompact,
            Self::SessionEnd => HookType::SessionEnd,
            Self::SessionStart => HookType::SessionStart,
        }
    }

    /// Whether the command consumes a transcript on stdin.
    #[must_use]
    pub fn reads_transcript(&self) -> bool {
        matches!(self, Self::PreCompact | Self::SessionEnd)
    }
}
