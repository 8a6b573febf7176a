//! Figure generator for hawk-dove innovation simulation output.
//!
//! Reads the CSV tree a simulation sweep leaves behind and writes one image
//! (plus a JSON sidecar of the plotted data) per figure, or a LaTeX table
//! for the tabular studies.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load configuration (defaults, file, `HAWKDOVE__*` environment)
//! 3. Initialize structured logging (tracing)
//! 4. Resolve figure styling and the input locator
//! 5. Run the selected figure jobs, sequentially or on a thread pool
//! 6. Report failures and exit non-zero if any job failed

mod catalog;
mod cli;
mod config;
mod error;
mod jobs;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::catalog::{FigureCatalog, FigureKind};
use crate::cli::Args;
use crate::config::{FiguresConfig, LogFormat, LoggingConfig};
use crate::error::FigureError;
use crate::jobs::JobContext;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the input
/// layout cannot be built, or any selected figure fails.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.list {
        for kind in FigureKind::ALL {
            println!("{:<20} {}", kind.name(), kind.description());
        }
        return Ok(());
    }

    let config = FiguresConfig::load(args.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.logging);
    info!(
        input = %config.input.root.display(),
        output = %config.output.root.display(),
        populations = config.experiment.populations.len(),
        powers = config.experiment.powers.len(),
        regimes = config.experiment.regimes.len(),
        "configuration loaded"
    );

    let catalog = FigureCatalog::new(&config.figures);
    let locator = config
        .input
        .locator(&config.experiment)
        .context("building input layout")?;
    let ctx = JobContext {
        config: &config,
        catalog: &catalog,
        locator: locator.as_ref(),
    };

    let selected = args.selected();
    let run = |kind: &FigureKind| (*kind, jobs::run(*kind, &ctx));
    let results: Vec<(FigureKind, Result<Vec<PathBuf>, FigureError>)> = if args.parallel {
        selected.par_iter().map(run).collect()
    } else {
        selected.iter().map(run).collect()
    };

    let mut written = 0_usize;
    let mut failed = Vec::new();
    for (kind, result) in results {
        match result {
            Ok(paths) => written = written.saturating_add(paths.len()),
            Err(e) => {
                error!(figure = %kind, error = %e, "figure failed");
                failed.push(kind.name());
            }
        }
    }
    info!(files = written, failed = failed.len(), "figure generation finished");

    if !failed.is_empty() {
        bail!("{} figure(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}
