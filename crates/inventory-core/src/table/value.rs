use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use std::fmt;

/// A single cell of a [`Table`](super::Table).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell. Text is never parsed here; use
    /// [`Value::coerce_numeric`] first when text may hold numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(f) => Some(*f),
            Value::Null | Value::Text(_) => None,
        }
    }

    /// Numbers pass through, text that parses as a number becomes one and
    /// everything else becomes `Null`.
    pub fn coerce_numeric(&self) -> Value {
        match self {
            Value::Integer(_) | Value::Real(_) => self.clone(),
            Value::Text(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    Value::Integer(i)
                } else if let Ok(f) = s.parse::<f64>() {
                    Value::Real(f)
                } else {
                    Value::Null
                }
            }
            Value::Null => Value::Null,
        }
    }

    /// String form of the cell. Reals always keep a fractional part (`1.0`).
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Real(f) => format!("{:?}", f),
            Value::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            other => f.write_str(&other.to_text()),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Real(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Value::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

/// Declared storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
}

impl ColumnType {
    /// Any text makes the column `Text`, otherwise any real makes it `Real`.
    /// An all-null column is `Text`.
    pub fn of_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> ColumnType {
        let mut seen_integer = false;
        let mut seen_real = false;
        for value in values {
            match value {
                Value::Text(_) => return ColumnType::Text,
                Value::Real(_) => seen_real = true,
                Value::Integer(_) => seen_integer = true,
                Value::Null => {}
            }
        }
        if seen_real {
            ColumnType::Real
        } else if seen_integer {
            ColumnType::Integer
        } else {
            ColumnType::Text
        }
    }

    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }
}
