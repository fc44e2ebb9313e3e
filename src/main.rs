//! CLI entry point for the thread downloader.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use thread_dl_core::{Pipeline, ProcessExit, Verbosity, exit_for_summary};
use tracing::debug;

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let thread_url = args.thread.clone();
    let config = args.into_config();

    init_tracing(config.verbosity);
    debug!(?config, "CLI arguments parsed");

    let mut pipeline = Pipeline::new(config)?;

    // Ctrl-C ends the run on the spot; completed files stay, nothing is printed.
    let exit = tokio::select! {
        result = pipeline.run_url(&thread_url) => match result {
            Ok(summary) => exit_for_summary(&summary),
            // Already logged by the pipeline.
            Err(_) => ProcessExit::Failure,
        },
        Ok(()) = tokio::signal::ctrl_c() => ProcessExit::Failure,
    };

    Ok(exit.into())
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over the flags.
fn init_tracing(verbosity: Verbosity) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(verbosity.default_filter()));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
