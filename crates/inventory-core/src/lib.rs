pub mod config;
pub mod error;
pub mod ingest;
pub mod progress;
pub mod scanner;
pub mod storage;
pub mod summary;
pub mod table;

pub use config::AppConfig;
pub use error::Error;
pub use ingest::{FileOutcome, IngestEngine, IngestOptions, IngestReport};
pub use progress::{ProgressReporter, SilentReporter, SummaryStep};
pub use storage::Database;
pub use summary::{build_summary, SUMMARY_TABLE};
pub use table::{ColumnType, Table, Value};
