//! CRM pipeline storage.
//!
//! This crate provides:
//! - The Arrow schema of the joined pipeline snapshot
//! - A staged Parquet writer with all-or-nothing commit
//! - A snapshot reader with schema-version checking and column accessors
//! - A DuckDB loader that replaces the analytical table wholesale

pub mod columns;
pub mod duck;
pub mod error;
pub mod reader;
pub mod schema;
pub mod writer;

pub use columns::{col_date32, col_f64, col_i64, col_utf8, date_to_days, days_to_date};
pub use duck::{AnalyticalStore, PendingReplace};
pub use error::{Result, StoreError};
pub use reader::{read_snapshot, read_snapshot_bytes};
pub use schema::{pipeline_schema, SCHEMA_VERSION_KEY};
pub use writer::{SnapshotCompression, SnapshotWriter, StagedSnapshot, WriterConfig};

/// Default maximum rows per Parquet row group.
pub const DEFAULT_ROW_GROUP_SIZE: usize = 64 * 1024;
