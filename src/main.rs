//! CLI entry point for the EIA archiver.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eia_archiver_core::config::DOTENV_FILE;
use eia_archiver_core::{
    ApiClient, ApiConfig, Archiver, VersionOutcome, new_output_dir, output_root_from_env,
};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match dotenvy::from_filename(DOTENV_FILE) {
        Ok(path) => debug!(path = %path.display(), "loaded credentials file"),
        Err(e) if e.not_found() => debug!("no {DOTENV_FILE} file; using process environment"),
        Err(e) => warn!(error = %e, "ignoring unreadable {DOTENV_FILE}"),
    }

    let config = ApiConfig::from_env().context("cannot start without an EIA API key")?;
    let client = ApiClient::new(&config).context("failed to set up the EIA API client")?;

    let output_root = args
        .output_dir
        .clone()
        .map_or_else(output_root_from_env, |root: PathBuf| root.join("eia_api"));
    let run_dir = new_output_dir(&output_root).with_context(|| {
        format!(
            "failed to allocate a run directory under '{}'",
            output_root.display()
        )
    })?;
    info!(run_dir = %run_dir.display(), "EIA archiver starting");

    let show_progress = !args.quiet && !args.no_progress && io::stderr().is_terminal();
    let archiver = Archiver::new(client, run_dir).with_progress(show_progress);

    for frequency in args.frequencies() {
        let options = args.query_options(frequency);
        let summary = archiver
            .archive(&options)
            .await
            .with_context(|| format!("failed to archive {frequency} data"))?;

        if let VersionOutcome::Observed { observed, severity } = &summary.version
            && severity.is_warning()
        {
            warn!(
                observed = %observed,
                expected = %config.expected_version,
                "{} API version drift; archived data may not match the expected schema",
                severity.as_str()
            );
        }
        info!(
            frequency = %frequency,
            total = summary.total,
            pages = summary.pages,
            archive = %summary.archive_path.display(),
            "archived"
        );
    }

    Ok(())
}
