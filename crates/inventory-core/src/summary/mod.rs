//! Vendor sales summary: aggregation query, cleaning pass and derived metrics.

pub mod clean;
pub mod metrics;
pub mod query;

use crate::error::Error;
use crate::progress::{ProgressReporter, SummaryStep};
use crate::storage::Database;
use crate::table::Table;
use std::time::Instant;
use tracing::info;

pub use clean::clean_summary;
pub use metrics::add_derived_metrics;
pub use query::create_vendor_summary;

/// Name the finished summary is written under.
pub const SUMMARY_TABLE: &str = "vendor_sales_summary";

const PREVIEW_ROWS: usize = 5;

/// Build the vendor sales summary from the base tables and replace
/// [`SUMMARY_TABLE`] with it. Returns the table that was written.
///
/// Any failure aborts the run before the summary table is touched, except a
/// failed write itself, which leaves the previous summary in place.
pub fn build_summary(db: &Database, reporter: &dyn ProgressReporter) -> Result<Table, Error> {
    let start = Instant::now();

    info!("{}.....", SummaryStep::Query);
    reporter.on_summary_step(SummaryStep::Query);
    let raw = create_vendor_summary(db)?;
    info!("\n{}", raw.head(PREVIEW_ROWS));

    info!("{}.....", SummaryStep::Clean);
    reporter.on_summary_step(SummaryStep::Clean);
    let mut summary = clean_summary(raw)?;
    add_derived_metrics(&mut summary)?;
    info!("\n{}", summary.head(PREVIEW_ROWS));

    info!("{}.....", SummaryStep::Persist);
    reporter.on_summary_step(SummaryStep::Persist);
    let rows = db
        .replace_table(SUMMARY_TABLE, &summary)
        .map_err(|source| Error::Ingestion {
            table: SUMMARY_TABLE.to_string(),
            source,
        })?;

    let elapsed = start.elapsed().as_secs_f64();
    info!("Completed: {} rows written to {} in {:.2}s", rows, SUMMARY_TABLE, elapsed);
    reporter.on_summary_complete(rows, elapsed);

    Ok(summary)
}
