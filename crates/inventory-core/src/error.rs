use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to parse {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("Failed to write table '{table}': {source}")]
    Ingestion {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query error: {0}")]
    Query(String),

    #[error("Table shape error: {0}")]
    Shape(String),

    #[error("{0}")]
    Other(String),
}
