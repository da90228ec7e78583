//! DuckDB analytical store.
//!
//! The store holds one table replaced wholesale from a Parquet file on every
//! transform run. The replacement runs inside a transaction that the caller
//! commits once its other outputs are in place; dropping the pending
//! replacement rolls back to the previous table.

use std::path::Path;

use duckdb::{Connection, Transaction};
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// Handle on a DuckDB database file.
pub struct AnalyticalStore {
    conn: Connection,
}

impl AnalyticalStore {
    /// Open (or create) the database file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "analytical store opened");
        Ok(Self { conn })
    }

    /// Replace `table` with the contents of a Parquet file, uncommitted.
    ///
    /// The new table is visible through the returned [`PendingReplace`]
    /// only; other connections keep seeing the old one until
    /// [`PendingReplace::commit`].
    pub fn replace_from_parquet(
        &mut self,
        table: &str,
        parquet: &Path,
    ) -> Result<PendingReplace<'_>> {
        let ident = quote_identifier(table)?;
        let source = quote_literal(&parquet.to_string_lossy());
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {ident} AS SELECT * FROM read_parquet({source});"
        ))?;
        let rows = count_rows(&tx, &ident)?;
        debug!(table, rows, "analytical table replaced, awaiting commit");
        Ok(PendingReplace {
            tx,
            table: table.to_string(),
            rows,
        })
    }

    /// Number of rows currently in `table`.
    pub fn row_count(&self, table: &str) -> Result<u64> {
        count_rows(&self.conn, &quote_identifier(table)?)
    }

    /// Column names of `table` in declaration order.
    pub fn columns(&self, table: &str) -> Result<Vec<String>> {
        table_columns(&self.conn, table)
    }
}

/// A table replacement that has not been committed yet.
pub struct PendingReplace<'a> {
    tx: Transaction<'a>,
    table: String,
    rows: u64,
}

impl PendingReplace<'_> {
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Column names of the replacement table.
    pub fn columns(&self) -> Result<Vec<String>> {
        table_columns(&self.tx, &self.table)
    }

    /// Make the replacement visible. Returns the new row count.
    pub fn commit(self) -> Result<u64> {
        self.tx.commit()?;
        info!(table = %self.table, rows = self.rows, "analytical table replaced");
        Ok(self.rows)
    }
}

fn count_rows(conn: &Connection, ident: &str) -> Result<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {ident}"), [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_name = ? ORDER BY ordinal_position",
    )?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}

fn quote_identifier(name: &str) -> Result<String> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError::InvalidTableName(name.to_string()));
    }
    Ok(format!("\"{name}\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::SnapshotWriter;
    use arrow::array::Int64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn parquet_with(dir: &TempDir, name: &str, values: Vec<i64>) -> PathBuf {
        let schema = Arc::new(Schema::new(vec![Field::new("value", DataType::Int64, false)]));
        let batch = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(values))]).unwrap();
        let path = dir.path().join(name);
        SnapshotWriter::default()
            .stage(&batch, &path)
            .unwrap()
            .commit()
            .unwrap();
        path
    }

    #[test]
    fn committed_replace_is_visible() {
        let dir = TempDir::new().unwrap();
        let source = parquet_with(&dir, "a.parquet", vec![1, 2, 3]);
        let mut store = AnalyticalStore::open(&dir.path().join("crm.duckdb")).unwrap();
        let pending = store.replace_from_parquet("pipeline", &source).unwrap();
        assert_eq!(pending.rows(), 3);
        assert_eq!(pending.columns().unwrap(), ["value"]);
        assert_eq!(pending.commit().unwrap(), 3);
        assert_eq!(store.row_count("pipeline").unwrap(), 3);
    }

    #[test]
    fn dropped_replace_rolls_back() {
        let dir = TempDir::new().unwrap();
        let first = parquet_with(&dir, "a.parquet", vec![1, 2]);
        let second = parquet_with(&dir, "b.parquet", vec![1, 2, 3, 4, 5]);
        let mut store = AnalyticalStore::open(&dir.path().join("crm.duckdb")).unwrap();
        store
            .replace_from_parquet("pipeline", &first)
            .unwrap()
            .commit()
            .unwrap();

        {
            let pending = store.replace_from_parquet("pipeline", &second).unwrap();
            assert_eq!(pending.rows(), 5);
        }

        assert_eq!(store.row_count("pipeline").unwrap(), 2);
    }

    #[test]
    fn identifiers_are_checked() {
        assert_eq!(quote_identifier("pipeline").unwrap(), "\"pipeline\"");
        assert!(quote_identifier("pipe\"line").is_err());
        assert!(quote_identifier("").is_err());
    }

    #[test]
    fn literals_escape_quotes() {
        assert_eq!(quote_literal("/tmp/o'neil/p.parquet"), "'/tmp/o''neil/p.parquet'");
    }

    #[test]
    fn row_count_of_missing_table_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = AnalyticalStore::open(&dir.path().join("crm.duckdb")).unwrap();
        assert!(store.row_count("pipeline").is_err());
        assert!(store.columns("pipeline").unwrap().is_empty());
    }
}
