use crate::error::Error;
use crate::ingest::IngestReport;
use std::fmt;

/// Major steps of a summary build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryStep {
    Query,
    Clean,
    Persist,
}

impl fmt::Display for SummaryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SummaryStep::Query => "Creating vendor summary table",
            SummaryStep::Clean => "Cleaning data",
            SummaryStep::Persist => "Ingesting data",
        })
    }
}

/// Trait for reporting pipeline progress.
///
/// The CLI implements it with indicatif progress bars; tests use [`SilentReporter`].
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_ingest_start(&self, _total_files: usize) {}
    fn on_file_ingested(&self, _file: &str, _table: &str, _rows: usize) {}
    fn on_file_failed(&self, _file: &str, _error: &Error) {}
    fn on_ingest_complete(&self, _report: &IngestReport) {}
    fn on_summary_step(&self, _step: SummaryStep) {}
    fn on_summary_complete(&self, _rows: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
