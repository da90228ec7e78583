//! `crm transform`: load, join and persist.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use crm_common::{OutputFormat, RunId};
use crm_config::{validate, ConfigError, ConfigSnapshot, PipelineConfig};
use crm_store::{SnapshotCompression, WriterConfig};

use super::{emit, envelope, report_error, resolve, to_json, GlobalOpts};
use crate::exit_codes::ExitCode;
use crate::transform::{run_transform as run_pipeline, TransformSummary};

const COMMAND: &str = "transform";

/// Parquet compression codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Codec {
    #[default]
    Zstd,
    Snappy,
    None,
}

impl From<Codec> for SnapshotCompression {
    fn from(codec: Codec) -> Self {
        match codec {
            Codec::Zstd => SnapshotCompression::Zstd,
            Codec::Snappy => SnapshotCompression::Snappy,
            Codec::None => SnapshotCompression::Uncompressed,
        }
    }
}

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Directory holding the raw CSV tables
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Parquet snapshot output path
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// DuckDB store output path
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Snapshot compression codec
    #[arg(long, value_enum, default_value_t = Codec::Zstd)]
    pub compression: Codec,
}

impl TransformArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(path) = &self.snapshot {
            config.snapshot_path = path.clone();
        }
        if let Some(path) = &self.store {
            config.store_path = path.clone();
        }
    }
}

fn execute(
    global: &GlobalOpts,
    args: &TransformArgs,
    run_id: &RunId,
) -> Result<TransformSummary, crm_common::Error> {
    let resolved = resolve(global)?;
    let mut config = resolved.config;
    args.apply(&mut config);
    validate(&config).map_err(ConfigError::from)?;

    let snapshot = ConfigSnapshot::from_config(resolved.source.to_string(), &config)?;
    let writer = WriterConfig::default().with_compression(args.compression.into());
    Ok(run_pipeline(run_id, &config, snapshot, &writer)?)
}

pub fn run_transform(global: &GlobalOpts, args: &TransformArgs) -> ExitCode {
    let run_id = RunId::new();
    let result = execute(global, args, &run_id).and_then(|summary| {
        let rendered = match global.format {
            OutputFormat::Json => {
                let body = serde_json::json!({
                    "rows": summary.rows,
                    "snapshot_path": summary.snapshot_path,
                    "store_path": summary.store_path,
                    "table": summary.table,
                    "join": summary.join,
                    "config": summary.config,
                });
                to_json(&envelope(COMMAND, &run_id, body))?
            }
            OutputFormat::Text | OutputFormat::Html => summary.completion_message(),
        };
        emit(None, &rendered)
    });

    match result {
        Ok(()) => ExitCode::Clean,
        Err(e) => report_error(global.format, COMMAND, &run_id, &e),
    }
}
