use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

mod config;
mod error;
mod git;
mod logging;
mod sync;
mod ui;

pub use error::{Result, SyncError};

#[derive(Parser)]
#[command(name = "gitthemall")]
#[command(about = "Keep git repos up-to-date")]
#[command(version)]
struct Cli {
    /// Config file that lists repos, one `<path>,<action>,...` per line
    /// (defaults to repos.conf in the user config directory)
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> anyhow::Result<sync::driver::Summary> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_config_path().context("Cannot determine config directory")?,
    };

    let tasks = config::load_tasks(&path)?;
    tracing::debug!("{} repos listed in {}", tasks.len(), path.display());

    let progress = !cli.verbose && std::io::stderr().is_terminal();
    let summary = sync::run(&git::Git, &tasks, progress)?;
    Ok(summary)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(summary) => {
            tracing::info!("{}", summary);
            if summary.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
