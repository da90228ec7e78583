//! Immutable snapshot handle for the presentation stage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crm_store::StoreError;

use super::filter::DateRange;
use crate::batch;
use crate::model::JoinedDeal;

/// The snapshot could not be loaded. Nothing is rendered in this case.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot not found at {}; run `crm transform` first", .0.display())]
    NotFound(PathBuf),

    #[error("snapshot at {} is unreadable: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

impl SnapshotError {
    pub fn path(&self) -> &Path {
        match self {
            SnapshotError::NotFound(path) | SnapshotError::Unreadable { path, .. } => path,
        }
    }
}

impl From<SnapshotError> for crm_common::Error {
    fn from(err: SnapshotError) -> Self {
        crm_common::Error::SnapshotUnavailable {
            path: err.path().display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Read-only joined rows shared by every view computed from them.
///
/// Cloning is cheap; the rows are never mutated after load.
#[derive(Debug, Clone)]
pub struct Snapshot {
    rows: Arc<[JoinedDeal]>,
    source: Option<PathBuf>,
}

impl Snapshot {
    /// Read a Parquet snapshot from disk.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let batch = crm_store::read_snapshot(path).map_err(|e| match e {
            StoreError::SnapshotNotFound(p) => SnapshotError::NotFound(p),
            source => SnapshotError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        let rows = batch::decode(&batch).map_err(|source| SnapshotError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), rows = rows.len(), "snapshot loaded");
        Ok(Self {
            rows: rows.into(),
            source: Some(path.to_path_buf()),
        })
    }

    pub fn from_rows(rows: Vec<JoinedDeal>) -> Self {
        Self {
            rows: rows.into(),
            source: None,
        }
    }

    pub fn rows(&self) -> &[JoinedDeal] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The values each filter control offers.
    pub fn options(&self) -> FilterOptions {
        let mut stages: Vec<String> = Vec::new();
        let mut agents: Vec<String> = Vec::new();
        let mut bounds: Option<(NaiveDate, NaiveDate)> = None;
        for row in self.rows.iter() {
            if !stages.contains(&row.deal_stage) {
                stages.push(row.deal_stage.clone());
            }
            if !agents.contains(&row.sales_agent) {
                agents.push(row.sales_agent.clone());
            }
            if let Some(d) = row.close_date {
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(d), hi.max(d)),
                    None => (d, d),
                });
            }
        }
        FilterOptions {
            stages,
            agents,
            close_dates: bounds.map(|(start, end)| DateRange { start, end }),
        }
    }
}

/// Distinct stages and agents in first-appearance order, plus the observed
/// close-date bounds (`None` when no row has a close date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub stages: Vec<String>,
    pub agents: Vec<String>,
    pub close_dates: Option<DateRange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::test_rows::row;
    use crm_store::SnapshotWriter;
    use tempfile::TempDir;

    #[test]
    fn options_keep_first_appearance_order() {
        let snap = Snapshot::from_rows(vec![
            row("Won", "Zed", Some("2024-03-01"), Some(10.0)),
            row("Engaging", "Amy", None, None),
            row("Won", "Amy", Some("2023-12-31"), Some(5.0)),
        ]);
        let opts = snap.options();
        assert_eq!(opts.stages, vec!["Won", "Engaging"]);
        assert_eq!(opts.agents, vec!["Zed", "Amy"]);
        let range = opts.close_dates.unwrap();
        assert_eq!(range.start.to_string(), "2023-12-31");
        assert_eq!(range.end.to_string(), "2024-03-01");
    }

    #[test]
    fn no_close_dates_gives_no_bounds() {
        let snap = Snapshot::from_rows(vec![row("Engaging", "Amy", None, None)]);
        assert_eq!(snap.options().close_dates, None);
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = Snapshot::load(Path::new("/nonexistent/pipeline.parquet")).unwrap_err();
        assert!(matches!(err, SnapshotError::NotFound(_)));
        let common: crm_common::Error = err.into();
        assert_eq!(common.code(), 40);
    }

    #[test]
    fn garbage_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.parquet");
        std::fs::write(&path, b"not parquet").unwrap();
        assert!(matches!(
            Snapshot::load(&path),
            Err(SnapshotError::Unreadable { .. })
        ));
    }

    #[test]
    fn loads_written_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.parquet");
        let rows = vec![row("Won", "Amy", Some("2024-01-10"), Some(100.0))];
        SnapshotWriter::default()
            .stage(&batch::encode(&rows).unwrap(), &path)
            .unwrap()
            .commit()
            .unwrap();
        let snap = Snapshot::load(&path).unwrap();
        assert_eq!(snap.rows(), rows.as_slice());
        assert_eq!(snap.source(), Some(path.as_path()));
    }
}
