//! Bulk table loader: one store table per delimited file in a directory.

use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner;
use crate::storage::Database;
use crate::table::read_csv;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub extension: String,
    pub delimiter: u8,
    pub ignore_patterns: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            extension: "csv".to_string(),
            delimiter: b',',
            ignore_patterns: Vec::new(),
        }
    }
}

impl IngestOptions {
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self {
            extension: config.file_extension.clone(),
            delimiter: config.delimiter_byte()?,
            ignore_patterns: config.ignore_patterns.clone(),
        })
    }
}

/// What happened to one source file.
#[derive(Debug)]
pub enum FileOutcome {
    Ingested {
        file: PathBuf,
        table: String,
        rows: usize,
    },
    Failed {
        file: PathBuf,
        table: String,
        error: Error,
    },
}

impl FileOutcome {
    pub fn file(&self) -> &Path {
        match self {
            FileOutcome::Ingested { file, .. } | FileOutcome::Failed { file, .. } => file,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            FileOutcome::Ingested { table, .. } | FileOutcome::Failed { table, .. } => table,
        }
    }

    pub fn is_ingested(&self) -> bool {
        matches!(self, FileOutcome::Ingested { .. })
    }
}

/// Per-run result of [`ingest_directory`]: one outcome per source file, in
/// processing order.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub outcomes: Vec<FileOutcome>,
    pub skipped: Vec<PathBuf>,
    pub duration: Duration,
}

impl IngestReport {
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ingested()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }

    pub fn rows_written(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Ingested { rows, .. } => *rows,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { file, error, .. } => Some((file.as_path(), error)),
            FileOutcome::Ingested { .. } => None,
        })
    }
}

pub struct IngestEngine {
    config: AppConfig,
}

impl IngestEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Ingest every source file under the configured data directory.
    pub fn ingest(
        &self,
        db: &Database,
        reporter: &dyn ProgressReporter,
    ) -> Result<IngestReport, Error> {
        let options = IngestOptions::from_config(&self.config)?;
        ingest_directory(Path::new(&self.config.data_dir), db, &options, reporter)
    }
}

/// Load each source file directly under `dir` into a table named after the
/// file stem, replacing any existing table of that name.
///
/// A file that fails to parse or write is logged, recorded in the report and
/// skipped; only an unreadable `dir` fails the whole run.
pub fn ingest_directory(
    dir: &Path,
    db: &Database,
    options: &IngestOptions,
    reporter: &dyn ProgressReporter,
) -> Result<IngestReport, Error> {
    let start = Instant::now();

    let discovery =
        scanner::discover_source_files(dir, &options.extension, &options.ignore_patterns)?;
    debug!(
        "{}: {} source files, {} skipped entries",
        dir.display(),
        discovery.sources.len(),
        discovery.skipped.len()
    );
    reporter.on_ingest_start(discovery.sources.len());

    let mut outcomes = Vec::with_capacity(discovery.sources.len());
    for path in discovery.sources {
        let outcome = ingest_file(&path, db, options.delimiter);
        let file_name = display_name(&path);
        match &outcome {
            FileOutcome::Ingested { table, rows, .. } => {
                reporter.on_file_ingested(&file_name, table, *rows);
            }
            FileOutcome::Failed { error: err, .. } => {
                error!("Failed to ingest {}: {}", file_name, err);
                debug!("{:?}", err);
                reporter.on_file_failed(&file_name, err);
            }
        }
        outcomes.push(outcome);
    }

    let report = IngestReport {
        outcomes,
        skipped: discovery.skipped,
        duration: start.elapsed(),
    };

    info!(
        "Ingestion complete: {} tables written, {} failed, {} skipped",
        report.succeeded_count(),
        report.failed_count(),
        report.skipped.len()
    );
    info!(
        "Total time taken: {:.2} minutes",
        report.duration.as_secs_f64() / 60.0
    );
    reporter.on_ingest_complete(&report);

    Ok(report)
}

/// Parse one file and replace its table. Never fails; errors are captured in
/// the returned outcome.
pub fn ingest_file(path: &Path, db: &Database, delimiter: u8) -> FileOutcome {
    let table = table_name_for(path);
    match load_into(path, &table, db, delimiter) {
        Ok(rows) => FileOutcome::Ingested {
            file: path.to_path_buf(),
            table,
            rows,
        },
        Err(error) => FileOutcome::Failed {
            file: path.to_path_buf(),
            table,
            error,
        },
    }
}

fn load_into(path: &Path, table: &str, db: &Database, delimiter: u8) -> Result<usize, Error> {
    let data = read_csv(path, delimiter)?;
    info!("Ingesting {} into database", display_name(path));
    db.replace_table(table, &data)
        .map_err(|source| Error::Ingestion {
            table: table.to_string(),
            source,
        })
}

/// Destination table name: the file name with its extension stripped.
pub fn table_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
