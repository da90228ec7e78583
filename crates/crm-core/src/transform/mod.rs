//! Transform stage.
//!
//! [`transform`] is the pure core: raw tables in, joined dataset out.
//! [`run_transform`] wraps it with CSV loading and persistence and is what
//! the `crm transform` command calls.

pub mod join;
pub mod persist;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crm_common::RunId;
use crm_config::{ConfigSnapshot, PipelineConfig};

use crate::ingest::{InputPaths, LoadError, RawSources};
use crate::model::{Deal, Derived, JoinedDeal};

pub use join::{left_join, JoinStats, LookupIndex};
pub use persist::{persist, PersistTargets, PersistSummary};

/// A deal paired with its derived features.
pub type DerivedDeal = (Deal, Derived);

/// The joined dataset. Row order matches the raw deals table.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedDataset {
    pub rows: Vec<JoinedDeal>,
    pub stats: JoinStats,
}

impl JoinedDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Errors that abort a transform run.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] arrow::error::ArrowError),

    #[error("failed to persist: {0}")]
    Store(#[from] crm_store::StoreError),

    #[error("failed to capture config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<TransformError> for crm_common::Error {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Load(e) => e.into(),
            TransformError::Config(e) => crm_common::Error::Json(e),
            other => crm_common::Error::Persist(other.to_string()),
        }
    }
}

/// Derive features for every deal.
pub fn derive(deals: &[Deal]) -> Vec<DerivedDeal> {
    deals
        .iter()
        .map(|d| (d.clone(), Derived::from_deal(d)))
        .collect()
}

/// Derive, then left-join accounts, teams and products.
///
/// Never drops or duplicates a deal: the output has exactly one row per
/// input deal, in input order.
pub fn transform(raw: &RawSources) -> JoinedDataset {
    let derived = derive(&raw.deals);
    let (rows, stats) = left_join(derived, &raw.accounts, &raw.teams, &raw.products);
    JoinedDataset { rows, stats }
}

/// Result of a completed transform run.
#[derive(Debug, Clone, Serialize)]
pub struct TransformSummary {
    pub run_id: RunId,
    pub rows: usize,
    pub snapshot_path: PathBuf,
    pub store_path: PathBuf,
    pub table: String,
    pub join: JoinStats,
    pub config: ConfigSnapshot,
}

impl TransformSummary {
    /// One-line completion message.
    pub fn completion_message(&self) -> String {
        format!(
            "ETL complete - {} rows written to {} and {}",
            crm_common::format::thousands(self.rows as i64),
            self.snapshot_path.display(),
            self.store_path.display()
        )
    }
}

/// Load, transform and persist according to `config`.
pub fn run_transform(
    run_id: &RunId,
    config: &PipelineConfig,
    config_snapshot: ConfigSnapshot,
    writer: &crm_store::WriterConfig,
) -> Result<TransformSummary, TransformError> {
    info!(%run_id, data_dir = %config.data_dir.display(), "transform started");

    let raw = RawSources::load(&InputPaths::from_config(config))?;
    let dataset = transform(&raw);
    info!(
        rows = dataset.len(),
        unmatched_accounts = dataset.stats.unmatched_accounts,
        unmatched_teams = dataset.stats.unmatched_teams,
        unmatched_products = dataset.stats.unmatched_products,
        "deals joined"
    );

    let targets = PersistTargets {
        snapshot_path: config.snapshot_path.clone(),
        store_path: config.store_path.clone(),
        table: config.table_name.clone(),
    };
    let persisted = persist(&dataset, &targets, writer)?;

    let summary = TransformSummary {
        run_id: run_id.clone(),
        rows: persisted.rows,
        snapshot_path: persisted.snapshot_path,
        store_path: persisted.store_path,
        table: targets.table,
        join: dataset.stats,
        config: config_snapshot,
    };
    info!(run_id = %summary.run_id, rows = summary.rows, "transform complete");
    Ok(summary)
}
