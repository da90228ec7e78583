//! Persisting the joined dataset.
//!
//! Both outputs are written or neither is. The snapshot is staged next to
//! its target and DuckDB replaces the table from the staged file inside an
//! open transaction. The snapshot rename happens next, and the transaction
//! commits only after it succeeds. Any earlier failure drops the stage
//! (deleting the temp file) and rolls the table back.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crm_store::{AnalyticalStore, SnapshotWriter, StoreError, WriterConfig};

use super::{JoinedDataset, TransformError};
use crate::batch;

/// Where the dataset goes.
#[derive(Debug, Clone)]
pub struct PersistTargets {
    pub snapshot_path: PathBuf,
    pub store_path: PathBuf,
    pub table: String,
}

/// What was written.
#[derive(Debug, Clone, Serialize)]
pub struct PersistSummary {
    pub rows: usize,
    pub snapshot_path: PathBuf,
    pub store_path: PathBuf,
    pub store_rows: u64,
}

/// Write the snapshot and replace the analytical table.
pub fn persist(
    dataset: &JoinedDataset,
    targets: &PersistTargets,
    writer: &WriterConfig,
) -> Result<PersistSummary, TransformError> {
    let batch = batch::encode(&dataset.rows)?;
    let stage = SnapshotWriter::new(writer.clone()).stage(&batch, &targets.snapshot_path)?;

    let mut store = AnalyticalStore::open(&targets.store_path)?;
    let pending = store.replace_from_parquet(&targets.table, stage.staged_path())?;

    let expected: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let found = pending.columns()?;
    if found != expected {
        return Err(StoreError::TableMismatch {
            table: targets.table.clone(),
            expected,
            found,
        }
        .into());
    }
    debug!(
        table = %targets.table,
        rows = pending.rows(),
        "analytical table loaded from staged snapshot"
    );

    let snapshot_path = stage.commit()?;
    let store_rows = pending.commit()?;
    info!(
        rows = dataset.len(),
        snapshot = %snapshot_path.display(),
        store = %targets.store_path.display(),
        "pipeline persisted"
    );

    Ok(PersistSummary {
        rows: dataset.len(),
        snapshot_path,
        store_path: targets.store_path.clone(),
        store_rows,
    })
}
