//! Error types for storage operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or reading pipeline storage.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet read/write error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// DuckDB error
    #[error("DuckDB error: {0}")]
    Duck(#[from] duckdb::Error),

    /// Snapshot file does not exist
    #[error("snapshot not found: {}", .0.display())]
    SnapshotNotFound(PathBuf),

    /// Snapshot written by an incompatible schema
    #[error("snapshot schema version {found} is not compatible (expected {expected})")]
    IncompatibleSchema { found: String, expected: String },

    /// Required column missing or of the wrong type
    #[error("column {name}: {reason}")]
    Column { name: String, reason: String },

    /// Loaded table does not have the snapshot's columns
    #[error("table {table} columns {found:?} do not match snapshot columns {expected:?}")]
    TableMismatch {
        table: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Table name cannot be used in DDL
    #[error("invalid table name: {0}")]
    InvalidTableName(String),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
