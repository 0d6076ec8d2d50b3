use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

use super::infer::{convert_cell, infer_column_type};
use super::Table;
use crate::error::Error;

/// Reads a delimited file with a header row into a [`Table`].
///
/// Short rows are padded with nulls; long rows, invalid UTF-8 and a missing
/// header are parse errors.
pub fn read_csv(path: &Path, delimiter: u8) -> Result<Table, Error> {
    let file = path.display().to_string();
    let parse_error = |reason: String| Error::Parse {
        file: file.clone(),
        reason,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| parse_error(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| parse_error(e.to_string()))?
        .clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(parse_error("no header row".to_string()));
    }
    let columns = dedupe_column_names(headers.iter());
    let width = columns.len();

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| parse_error(e.to_string()))?;
        if record.len() > width {
            // header is line 1
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);
            return Err(parse_error(format!(
                "line {}: expected {} fields, saw {}",
                line,
                width,
                record.len()
            )));
        }
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    let column_types: Vec<_> = (0..width)
        .map(|col| infer_column_type(raw_rows.iter().map(|row| row.get(col).map(String::as_str))))
        .collect();
    debug!("{}: {} rows, column types {:?}", file, raw_rows.len(), column_types);

    let rows = raw_rows
        .iter()
        .map(|row| {
            column_types
                .iter()
                .enumerate()
                .map(|(col, ty)| convert_cell(row.get(col).map(String::as_str), *ty))
                .collect()
        })
        .collect();

    Ok(Table::from_parts(columns, rows))
}

/// Blank header cells become `Unnamed: <index>`; repeated names get a `.1`,
/// `.2`, … suffix so every column is addressable.
fn dedupe_column_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for (idx, header) in headers.enumerate() {
        let name = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header.to_string()
        };
        let mut candidate = name.clone();
        let mut suffix = 1;
        while columns.contains(&candidate) {
            candidate = format!("{}.{}", name, suffix);
            suffix += 1;
        }
        columns.push(candidate);
    }
    columns
}
