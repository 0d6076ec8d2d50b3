use indicatif::{ProgressBar, ProgressStyle};
use inventory_core::{Error, IngestReport, ProgressReporter, SummaryStep};
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter using indicatif progress bars.
///
/// - Ingest: progress bar over the discovered source files
/// - Summary: spinner whose message follows the current step
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    /// Drop any bar still on screen, e.g. after a failed stage.
    pub fn clear(&self) {
        self.finish_bar();
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                f(pb);
            }
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(TICK_CHARS)
}

impl ProgressReporter for CliReporter {
    fn on_ingest_start(&self, total_files: usize) {
        let pb = ProgressBar::new(total_files as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Ingesting [{bar:30.cyan/dim}] {pos}/{len} files {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_file_ingested(&self, file: &str, _table: &str, _rows: usize) {
        self.with_bar(|pb| {
            pb.set_message(file.to_string());
            pb.inc(1);
        });
    }

    fn on_file_failed(&self, file: &str, error: &Error) {
        self.with_bar(|pb| {
            pb.println(format!("  \x1b[31m✗\x1b[0m {}: {}", file, error));
            pb.inc(1);
        });
    }

    fn on_ingest_complete(&self, report: &IngestReport) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Ingest complete: {} tables, {} failed in {:.2}s",
            report.succeeded_count(),
            report.failed_count(),
            report.duration.as_secs_f64()
        );
    }

    fn on_summary_step(&self, step: SummaryStep) {
        if step == SummaryStep::Query {
            let pb = ProgressBar::new_spinner();
            pb.set_style(spinner_style());
            pb.enable_steady_tick(Duration::from_millis(80));
            self.set_bar(pb);
        }
        self.with_bar(|pb| pb.set_message(format!("{}...", step)));
    }

    fn on_summary_complete(&self, rows: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Summary complete: {} rows in {:.2}s",
            rows, duration_secs
        );
    }
}
