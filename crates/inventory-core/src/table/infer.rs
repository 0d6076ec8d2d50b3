//! Per-column type inference for freshly read CSV cells.

use super::value::{ColumnType, Value};

/// Cell contents treated as missing, compared after trimming.
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "NULL", "null", "None", "#N/A"];

#[derive(Default, Clone)]
struct NumericStats {
    integer: usize,
    real: usize,
    non_numeric: usize,
}

pub(crate) fn is_null_token(raw: &str) -> bool {
    NULL_TOKENS.contains(&raw.trim())
}

/// Integer when every present cell is an `i64`, Real when every present cell
/// is at least an `f64`, Text otherwise.
pub(crate) fn infer_column_type<'a>(cells: impl Iterator<Item = Option<&'a str>>) -> ColumnType {
    let mut stats = NumericStats::default();

    for raw in cells.flatten() {
        if is_null_token(raw) {
            continue;
        }
        let trimmed = raw.trim();
        if trimmed.parse::<i64>().is_ok() {
            stats.integer += 1;
        } else if trimmed.parse::<f64>().is_ok() {
            stats.real += 1;
        } else {
            stats.non_numeric += 1;
            break;
        }
    }

    if stats.non_numeric > 0 {
        ColumnType::Text
    } else if stats.real > 0 {
        ColumnType::Real
    } else if stats.integer > 0 {
        ColumnType::Integer
    } else {
        ColumnType::Text
    }
}

/// Converts one raw cell given its column's inferred type. Padding cells
/// (`None`) and null tokens become `Null`.
pub(crate) fn convert_cell(raw: Option<&str>, column_type: ColumnType) -> Value {
    let raw = match raw {
        Some(raw) if !is_null_token(raw) => raw,
        _ => return Value::Null,
    };
    match column_type {
        ColumnType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or(Value::Null),
        ColumnType::Real => raw
            .trim()
            .parse::<f64>()
            .map(Value::Real)
            .unwrap_or(Value::Null),
        ColumnType::Text => Value::Text(raw.to_string()),
    }
}
