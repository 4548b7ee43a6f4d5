//! `forge-rag-hook` binary.

#![deny(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use forge_agent::cli::Cli;
use forge_agent::dispatch::{dispatch, project_dir};
use forge_agent::input::read_transcript;
use forge_core::logging::init_subscriber;
use forge_settings::{HookSettings, load_settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
    };

    let settings = load_settings();
    init_subscriber(&settings.log_level);
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "panic in hook");
    }));

    if let Err(error) = run(cli, &settings).await {
        tracing::warn!(error = %format!("{error:#}"), "hook setup failed");
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli, settings: &HookSettings) -> Result<()> {
    let project = project_dir(cli.project_dir.as_deref())
        .context("cannot resolve project directory")?;
    tracing::debug!(
        command = ?cli.command,
        project = %project.display(),
        forge_home = ?settings.forge_home,
        "hook invoked"
    );

    let transcript = if cli.command.reads_transcript() {
        read_transcript()
    } else {
        String::new()
    };
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, project, settings, &transcript, &mut stdout).await;
    Ok(())
}
