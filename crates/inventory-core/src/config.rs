use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::Path;

use crate::error::Error;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory scanned by the loader (direct children only).
    pub data_dir: String,
    /// SQLite database file shared by both stages.
    pub db_path: String,
    /// Extension a file must carry to be ingested, without the dot.
    pub file_extension: String,
    pub delimiter: String,
    pub ignore_patterns: Vec<String>,
    pub ingest_log_path: String,
    pub summary_log_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_path: "inventory.db".to_string(),
            file_extension: "csv".to_string(),
            delimiter: ",".to_string(),
            ignore_patterns: Vec::new(),
            ingest_log_path: "logs/ingestion_db.log".to_string(),
            summary_log_path: "logs/get_vendor_summary.log".to_string(),
        }
    }
}

impl AppConfig {
    /// The configured delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, Error> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(Error::Config(ConfigError::Message(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )))),
        }
    }
}

/// Defaults, then an optional `Config.toml` in the working directory, then
/// `INVENTORY_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(environment())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(true))
        .add_source(environment())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

fn environment() -> Environment {
    Environment::with_prefix("INVENTORY")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("ignore_patterns")
}
