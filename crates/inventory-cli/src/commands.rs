use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "inventory")]
#[command(about = "Load inventory CSVs into SQLite and build the vendor sales summary", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load every CSV in the data directory into its own table
    Ingest,
    /// Build the vendor_sales_summary table from the loaded base tables
    Summary,
    /// Ingest, then build the summary
    Run,
    /// Print configuration values
    PrintConfig,
}
