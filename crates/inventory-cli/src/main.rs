mod commands;
mod logging;
mod progress;

use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use inventory_core::storage::Database;
use inventory_core::{AppConfig, IngestEngine, SUMMARY_TABLE};
use progress::CliReporter;
use tracing::error;

fn main() {
    dotenv().ok();

    let args = Cli::parse();

    let config = match inventory_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let result = match args.command {
        Some(Commands::Ingest) => in_stage(&config.ingest_log_path, || run_ingest(&config)),
        Some(Commands::Summary) => in_stage(&config.summary_log_path, || run_summary(&config)),
        Some(Commands::Run) => in_stage(&config.ingest_log_path, || run_ingest(&config))
            .and_then(|_| in_stage(&config.summary_log_path, || run_summary(&config))),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if result.is_err() {
        process::exit(1);
    }
}

/// Run one stage with its own log file. Errors are logged before returning
/// so they land in that stage's log.
fn in_stage(log_path: &str, stage: impl FnOnce() -> Result<()>) -> Result<()> {
    let (dispatch, _guard) = logging::stage_logger(log_path);
    tracing::dispatcher::with_default(&dispatch, || {
        let result = stage();
        if let Err(err) = &result {
            error!("Error: {:#}", err);
        }
        result
    })
}

fn open_store(config: &AppConfig) -> Result<Database> {
    Database::open(&config.db_path)
        .with_context(|| format!("opening store at {}", config.db_path))
}

fn run_ingest(config: &AppConfig) -> Result<()> {
    let db = open_store(config)?;
    let engine = IngestEngine::new(config.clone());
    let reporter = CliReporter::new();

    let report = engine
        .ingest(&db, &reporter)
        .map_err(|err| {
            reporter.clear();
            err
        })
        .with_context(|| format!("ingesting {}", config.data_dir))?;

    // plain-text totals are already in the stage log; colour stays on the terminal
    println!(
        "{} tables written ({} rows), {} failed, {} skipped",
        format!("{}", report.succeeded_count()).green(),
        format!("{}", report.rows_written()).green(),
        format!("{}", report.failed_count()).red(),
        report.skipped.len(),
    );
    for (file, err) in report.failures() {
        println!("  {} {}", file.display().to_string().red(), err);
    }

    Ok(())
}

fn run_summary(config: &AppConfig) -> Result<()> {
    let db = open_store(config)?;
    let reporter = CliReporter::new();

    let summary = inventory_core::build_summary(&db, &reporter).map_err(|err| {
        reporter.clear();
        err
    })?;

    println!(
        "{} rows written to {}",
        format!("{}", summary.len()).green(),
        SUMMARY_TABLE.cyan(),
    );

    Ok(())
}
