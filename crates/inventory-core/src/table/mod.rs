//! In-memory tabular structure shared by the loader and the summary builder.

mod infer;
mod reader;
mod value;

pub use reader::read_csv;
pub use value::{ColumnType, Value};

use crate::error::Error;
use std::fmt;
use tabled::builder::Builder;
use tabled::settings::object::Segment;
use tabled::settings::{Alignment, Modify, Style};

/// Named columns over ordered rows. Every row holds exactly one value per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Trusted constructor for rows produced by the store.
    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), Error> {
        if row.len() != self.columns.len() {
            return Err(Error::Shape(format!(
                "row has {} values but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<Value>] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn column_types(&self) -> Vec<ColumnType> {
        (0..self.columns.len())
            .map(|idx| ColumnType::of_values(self.rows.iter().map(|row| &row[idx])))
            .collect()
    }

    /// Appends a column; `values` must supply one value per existing row.
    pub fn add_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), Error> {
        if values.len() != self.rows.len() {
            return Err(Error::Shape(format!(
                "column '{}' has {} values but table has {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        if self.column_index(name).is_some() {
            return Err(Error::Shape(format!("column '{}' already exists", name)));
        }
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// A copy holding at most the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(|v| v.to_string()));
        }
        let grid = builder
            .build()
            .with(Style::psql())
            .with(Modify::new(Segment::all()).with(Alignment::right()))
            .to_string();
        write!(f, "{}", grid)
    }
}
