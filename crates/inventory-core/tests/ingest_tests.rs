use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

use inventory_core::ingest::{ingest_directory, ingest_file};
use inventory_core::storage::Database;
use inventory_core::{
    AppConfig, Error, FileOutcome, IngestEngine, IngestOptions, IngestReport, ProgressReporter,
    SilentReporter, Table, Value,
};

/// Records reporter callbacks so tests can check what the loader announced.
#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn on_ingest_start(&self, total_files: usize) {
        self.events.lock().unwrap().push(format!("start {}", total_files));
    }

    fn on_file_ingested(&self, file: &str, table: &str, rows: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("ok {} -> {} ({})", file, table, rows));
    }

    fn on_file_failed(&self, file: &str, _error: &Error) {
        self.events.lock().unwrap().push(format!("failed {}", file));
    }

    fn on_ingest_complete(&self, report: &IngestReport) {
        self.events.lock().unwrap().push(format!(
            "done {}/{}",
            report.succeeded_count(),
            report.outcomes.len()
        ));
    }
}

/// Layout:
///   data/
///     sales.csv          (3 data rows)
///     purchases.csv      (2 data rows)
///     readme.txt         ← not a source
fn create_data_dir(root: &Path) {
    fs::create_dir_all(root).unwrap();
    fs::write(
        root.join("sales.csv"),
        "VendorNo,Brand,SalesQuantity,SalesDollars\n\
         105,8412,4,199.96\n\
         105,8412,2,99.98\n\
         4466,5255,3,38.97\n",
    )
    .unwrap();
    fs::write(
        root.join("purchases.csv"),
        "VendorNumber,VendorName,Brand,PurchasePrice\n\
         105,ALTAMAR BRANDS LLC,8412,35.71\n\
         4466,AMERICAN VINTAGE BEVERAGE,5255,9.35\n",
    )
    .unwrap();
    fs::write(root.join("readme.txt"), "not,a,table\n1,2,3\n").unwrap();
}

#[test]
fn test_every_source_file_becomes_a_table() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    create_data_dir(&data);

    let db = Database::open_in_memory().unwrap();
    let report =
        ingest_directory(&data, &db, &IngestOptions::default(), &SilentReporter).unwrap();

    assert_eq!(report.succeeded_count(), 2);
    assert_eq!(report.failed_count(), 0);
    assert_eq!(report.rows_written(), 5);
    assert_eq!(report.skipped.len(), 1);

    assert_eq!(db.list_tables().unwrap(), vec!["purchases", "sales"]);
    assert_eq!(db.row_count("sales").unwrap(), 3);
    assert_eq!(db.row_count("purchases").unwrap(), 2);
    assert!(!db.table_exists("readme").unwrap());

    let sales = db.read_table("sales").unwrap();
    assert_eq!(
        sales.columns(),
        ["VendorNo", "Brand", "SalesQuantity", "SalesDollars"]
    );
    assert_eq!(
        sales.rows()[2],
        vec![
            Value::Integer(4466),
            Value::Integer(5255),
            Value::Integer(3),
            Value::Real(38.97)
        ]
    );
}

#[test]
fn test_malformed_file_does_not_block_others() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    create_data_dir(&data);
    // third data row has one field too many
    fs::write(data.join("broken.csv"), "a,b\n1,2\n3,4\n5,6,7\n").unwrap();
    // invalid UTF-8
    fs::write(data.join("binary.csv"), [b'a', b'\n', 0xff, 0xfe, b'\n']).unwrap();

    let db = Database::open_in_memory().unwrap();
    let reporter = RecordingReporter::default();
    let report = ingest_directory(&data, &db, &IngestOptions::default(), &reporter).unwrap();

    assert_eq!(report.succeeded_count(), 2);
    assert_eq!(report.failed_count(), 2);
    for (file, error) in report.failures() {
        assert!(
            matches!(error, Error::Parse { .. }),
            "{} failed with {}",
            file.display(),
            error
        );
    }
    assert!(!db.table_exists("broken").unwrap());
    assert!(!db.table_exists("binary").unwrap());
    assert_eq!(db.row_count("sales").unwrap(), 3);

    // files are visited in name order
    assert_eq!(
        reporter.events(),
        vec![
            "start 4",
            "failed binary.csv",
            "failed broken.csv",
            "ok purchases.csv -> purchases (2)",
            "ok sales.csv -> sales (3)",
            "done 2/4",
        ]
    );
}

#[test]
fn test_store_write_failure_does_not_block_others() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    // parses fine, but sqlite column names are case-insensitive
    fs::write(data.join("a.csv"), "Brand,brand\n1,2\n").unwrap();
    fs::write(data.join("b.csv"), "Brand,Size\n58,750mL\n").unwrap();

    let db = Database::open_in_memory().unwrap();
    let report = ingest_directory(&data, &db, &IngestOptions::default(), &SilentReporter).unwrap();

    assert_eq!(report.succeeded_count(), 1);
    assert_eq!(report.failed_count(), 1);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures[0].0.file_name().unwrap(), "a.csv");
    match failures[0].1 {
        Error::Ingestion { table, source } => {
            assert_eq!(table, "a");
            assert!(source.to_string().contains("duplicate column name"), "{source}");
        }
        other => panic!("expected ingestion error, got {other}"),
    }
    assert_eq!(db.list_tables().unwrap(), ["b"]);
    assert_eq!(db.row_count("b").unwrap(), 1);
}

#[test]
fn test_failed_file_leaves_existing_table_untouched() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("sales.csv"), "a,b\n1,2\n").unwrap();

    let db = Database::open_in_memory().unwrap();
    ingest_directory(&data, &db, &IngestOptions::default(), &SilentReporter).unwrap();

    fs::write(data.join("sales.csv"), "a,b\n1,2,3\n").unwrap();
    let outcome = ingest_file(&data.join("sales.csv"), &db, b',');
    assert!(matches!(outcome, FileOutcome::Failed { .. }));
    assert_eq!(outcome.table(), "sales");

    assert_eq!(db.row_count("sales").unwrap(), 1);
}

#[test]
fn test_second_run_replaces_instead_of_appending() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    create_data_dir(&data);

    let db = Database::open_in_memory().unwrap();
    ingest_directory(&data, &db, &IngestOptions::default(), &SilentReporter).unwrap();
    let first: Vec<Table> = ["sales", "purchases"]
        .iter()
        .map(|t| db.read_table(t).unwrap())
        .collect();

    ingest_directory(&data, &db, &IngestOptions::default(), &SilentReporter).unwrap();
    let second: Vec<Table> = ["sales", "purchases"]
        .iter()
        .map(|t| db.read_table(t).unwrap())
        .collect();

    assert_eq!(first, second);
    assert_eq!(db.row_count("sales").unwrap(), 3);
}

#[test]
fn test_existing_table_schema_is_replaced() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    create_data_dir(&data);

    let db = Database::open_in_memory().unwrap();
    db.connection()
        .execute_batch(
            "CREATE TABLE sales (legacy TEXT);
             INSERT INTO sales VALUES ('old'), ('older');",
        )
        .unwrap();

    ingest_directory(&data, &db, &IngestOptions::default(), &SilentReporter).unwrap();

    assert_eq!(
        db.table_columns("sales").unwrap(),
        vec!["VendorNo", "Brand", "SalesQuantity", "SalesDollars"]
    );
    assert_eq!(db.row_count("sales").unwrap(), 3);
}

#[test]
fn test_header_only_file_creates_empty_table() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("vendor_invoice.csv"), "VendorNumber,Freight\n").unwrap();

    let db = Database::open_in_memory().unwrap();
    let report =
        ingest_directory(&data, &db, &IngestOptions::default(), &SilentReporter).unwrap();

    assert_eq!(report.succeeded_count(), 1);
    assert_eq!(db.row_count("vendor_invoice").unwrap(), 0);
    assert_eq!(
        db.table_columns("vendor_invoice").unwrap(),
        vec!["VendorNumber", "Freight"]
    );
}

#[test]
fn test_missing_source_directory_is_an_error() {
    let tmp = tempdir().unwrap();
    let db = Database::open_in_memory().unwrap();
    let result = ingest_directory(
        &tmp.path().join("absent"),
        &db,
        &IngestOptions::default(),
        &SilentReporter,
    );
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_engine_uses_configured_directory_and_ignores() {
    let tmp = tempdir().unwrap();
    let data = tmp.path().join("incoming");
    create_data_dir(&data);
    fs::write(data.join("sales_backup.csv"), "x\n1\n").unwrap();

    let config = AppConfig {
        data_dir: data.to_string_lossy().into_owned(),
        ignore_patterns: vec!["*_backup*".to_string()],
        ..AppConfig::default()
    };

    let db = Database::open_in_memory().unwrap();
    let report = IngestEngine::new(config).ingest(&db, &SilentReporter).unwrap();

    assert_eq!(report.succeeded_count(), 2);
    assert!(!db.table_exists("sales_backup").unwrap());
}
