//! Parquet snapshot writer with staged, all-or-nothing commit.
//!
//! The snapshot is first written to `<target>.tmp`. Callers that have more
//! persistence work to do (loading DuckDB from the staged file) finish it
//! and only then [`StagedSnapshot::commit`], which renames the staged file
//! over the target. Dropping an uncommitted stage removes the temp file, so
//! a failed run leaves the previous snapshot in place.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tracing::{debug, warn};

use crate::error::Result;
use crate::DEFAULT_ROW_GROUP_SIZE;

/// Column compression codec for the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotCompression {
    #[default]
    Zstd,
    Snappy,
    Uncompressed,
}

impl SnapshotCompression {
    fn codec(self) -> Compression {
        match self {
            SnapshotCompression::Zstd => Compression::ZSTD(Default::default()),
            SnapshotCompression::Snappy => Compression::SNAPPY,
            SnapshotCompression::Uncompressed => Compression::UNCOMPRESSED,
        }
    }
}

/// Writer configuration.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub compression: SnapshotCompression,
    pub max_row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: SnapshotCompression::default(),
            max_row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

impl WriterConfig {
    pub fn with_compression(mut self, compression: SnapshotCompression) -> Self {
        self.compression = compression;
        self
    }

    fn properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression.codec())
            .set_max_row_group_size(self.max_row_group_size)
            .build()
    }
}

/// Writes the joined dataset as a single Parquet file.
#[derive(Debug, Clone, Default)]
pub struct SnapshotWriter {
    config: WriterConfig,
}

impl SnapshotWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Encode a batch to Parquet bytes in memory.
    pub fn to_bytes(&self, batch: &RecordBatch) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut writer =
                ArrowWriter::try_new(&mut buf, batch.schema(), Some(self.config.properties()))?;
            writer.write(batch)?;
            writer.close()?;
        }
        Ok(buf)
    }

    /// Write a batch next to `target` without touching `target` itself.
    pub fn stage(&self, batch: &RecordBatch, target: &Path) -> Result<StagedSnapshot> {
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let staged = staged_path(target);
        let stage = StagedSnapshot {
            staged: staged.clone(),
            target: target.to_path_buf(),
            committed: false,
        };

        let file = File::create(&staged)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(self.config.properties()))?;
        writer.write(batch)?;
        writer.close()?;

        debug!(path = %staged.display(), rows = batch.num_rows(), "snapshot staged");
        Ok(stage)
    }

}

/// A fully written snapshot waiting to replace the target file.
#[derive(Debug)]
pub struct StagedSnapshot {
    staged: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedSnapshot {
    /// Path of the staged file, readable until commit.
    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    /// Atomically replace the target with the staged file.
    pub fn commit(mut self) -> Result<PathBuf> {
        fs::rename(&self.staged, &self.target)?;
        self.committed = true;
        debug!(path = %self.target.display(), "snapshot committed");
        Ok(self.target.clone())
    }
}

impl Drop for StagedSnapshot {
    fn drop(&mut self) {
        if !self.committed && self.staged.exists() {
            if let Err(e) = fs::remove_file(&self.staged) {
                warn!(path = %self.staged.display(), error = %e, "failed to remove staged snapshot");
            }
        }
    }
}

fn staged_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}
