use super::sqlite::Database;
use crate::table::{Table, Value};
use rusqlite::{params, params_from_iter, Result};
use tracing::debug;

/// Double-quotes an SQL identifier, doubling any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl Database {
    // ── Writes ───────────────────────────────────────────────────

    /// Drop any table called `name`, recreate it from the table's columns and
    /// declared types, and insert every row. Runs in a single transaction so a
    /// failed write leaves the previous table in place.
    pub fn replace_table(&self, name: &str, table: &Table) -> Result<usize> {
        let quoted = quote_ident(name);
        let column_defs: Vec<String> = table
            .columns()
            .iter()
            .zip(table.column_types())
            .map(|(column, ty)| format!("{} {}", quote_ident(column), ty.sql_type()))
            .collect();

        let tx = self.connection().unchecked_transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {quoted};
             CREATE TABLE {quoted} ({});",
            column_defs.join(", ")
        ))?;

        let mut count = 0;
        {
            let placeholders: Vec<String> =
                (1..=table.columns().len()).map(|i| format!("?{}", i)).collect();
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO {quoted} VALUES ({})",
                placeholders.join(", ")
            ))?;
            for row in table.rows() {
                count += stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        debug!("Replaced table {} with {} rows", name, count);
        Ok(count)
    }

    // ── Introspection ────────────────────────────────────────────

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        self.connection().query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            params![name],
            |row| row.get(0),
        )
    }

    /// Column names of `name` in declaration order; empty when the table does not exist.
    pub fn table_columns(&self, name: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map(params![name], |row| row.get(0))?
            .collect::<Result<Vec<String>>>()?;
        Ok(columns)
    }

    pub fn row_count(&self, name: &str) -> Result<i64> {
        self.connection().query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(name)),
            [],
            |row| row.get(0),
        )
    }

    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self.connection().prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>>>()?;
        Ok(names)
    }

    // ── Reads ────────────────────────────────────────────────────

    pub fn read_table(&self, name: &str) -> Result<Table> {
        self.query_table(&format!("SELECT * FROM {}", quote_ident(name)))
    }

    /// Run a read query and collect the full result set.
    pub fn query_table(&self, sql: &str) -> Result<Table> {
        let mut stmt = self.connection().prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|idx| row.get_ref(idx).map(Value::from))
                    .collect::<Result<Vec<Value>>>()
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(Table::from_parts(columns, rows))
    }
}
