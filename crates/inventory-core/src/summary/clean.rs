use crate::error::Error;
use crate::table::{Table, Value};

/// Coerce `Volume` to a number, replace every null with `0`, and trim the
/// vendor name and description after converting them to text.
///
/// Nulls are filled before the text columns are converted, so a missing
/// vendor name becomes the text `"0"`.
pub fn clean_summary(mut table: Table) -> Result<Table, Error> {
    let volume = required_column(&table, "Volume")?;
    let vendor_name = required_column(&table, "VendorName")?;
    let description = required_column(&table, "Description")?;

    for row in table.rows_mut() {
        row[volume] = row[volume].coerce_numeric();

        for cell in row.iter_mut() {
            if cell.is_null() {
                *cell = Value::Integer(0);
            }
        }

        for idx in [vendor_name, description] {
            row[idx] = Value::Text(row[idx].to_text().trim().to_string());
        }
    }

    Ok(table)
}

pub(crate) fn required_column(table: &Table, name: &str) -> Result<usize, Error> {
    table
        .column_index(name)
        .ok_or_else(|| Error::Query(format!("summary result has no column '{}'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_summary() -> Table {
        let mut table = Table::new(
            ["VendorName", "Description", "Volume", "TotalSalesDollars"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        table
            .push_row(vec![
                Value::from("DIAGEO NORTH AMERICA INC   "),
                Value::from("  Ketel One Vodka"),
                Value::from("750"),
                Value::Null,
            ])
            .unwrap();
        table
            .push_row(vec![
                Value::Null,
                Value::Integer(12),
                Value::from("Unknown"),
                Value::Real(99.5),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_volume_is_coerced_and_nulls_filled() {
        let cleaned = clean_summary(raw_summary()).unwrap();
        let rows = cleaned.rows();
        assert_eq!(rows[0][2], Value::Integer(750));
        assert_eq!(rows[1][2], Value::Integer(0));
        assert_eq!(rows[0][3], Value::Integer(0));
        assert_eq!(rows[1][3], Value::Real(99.5));
    }

    #[test]
    fn test_text_columns_are_trimmed_strings() {
        let cleaned = clean_summary(raw_summary()).unwrap();
        let rows = cleaned.rows();
        assert_eq!(rows[0][0], Value::from("DIAGEO NORTH AMERICA INC"));
        assert_eq!(rows[0][1], Value::from("Ketel One Vodka"));
        assert_eq!(rows[1][0], Value::from("0"));
        assert_eq!(rows[1][1], Value::from("12"));
    }

    #[test]
    fn test_missing_column_is_query_error() {
        let table = Table::new(vec!["VendorName".to_string()]);
        assert!(matches!(clean_summary(table), Err(Error::Query(_))));
    }
}
