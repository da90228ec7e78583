//! Snapshot reader.

use std::fs::File;
use std::path::Path;

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use crm_common::schema::is_compatible;
use crm_common::SCHEMA_VERSION;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::schema::SCHEMA_VERSION_KEY;

/// Read a Parquet snapshot into one batch.
///
/// Fails with [`StoreError::SnapshotNotFound`] when the file is absent and
/// with [`StoreError::IncompatibleSchema`] when it was written under a
/// different major schema version.
pub fn read_snapshot(path: &Path) -> Result<RecordBatch> {
    if !path.is_file() {
        return Err(StoreError::SnapshotNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let batch = read_batches(ParquetRecordBatchReaderBuilder::try_new(file)?)?;
    debug!(path = %path.display(), rows = batch.num_rows(), "snapshot read");
    Ok(batch)
}

/// Read a snapshot from in-memory Parquet bytes.
pub fn read_snapshot_bytes(data: Vec<u8>) -> Result<RecordBatch> {
    let buf = bytes::Bytes::from(data);
    read_batches(ParquetRecordBatchReaderBuilder::try_new(buf)?)
}

fn read_batches<T: ChunkReader + 'static>(
    builder: ParquetRecordBatchReaderBuilder<T>,
) -> Result<RecordBatch> {
    let schema = builder.schema().clone();
    check_version(schema.metadata().get(SCHEMA_VERSION_KEY))?;
    let reader = builder.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

fn check_version(found: Option<&String>) -> Result<()> {
    match found {
        Some(v) if is_compatible(v) => Ok(()),
        Some(v) => Err(StoreError::IncompatibleSchema {
            found: v.clone(),
            expected: SCHEMA_VERSION.to_string(),
        }),
        None => Err(StoreError::IncompatibleSchema {
            found: "<none>".to_string(),
            expected: SCHEMA_VERSION.to_string(),
        }),
    }
}
