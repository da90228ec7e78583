//! Pipeline configuration types.
//!
//! Every field has a default matching the conventional project layout:
//! raw tables under `data/`, the snapshot next to them and the DuckDB file
//! in the working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::CONFIG_SCHEMA_VERSION;

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub schema_version: String,

    /// Directory holding the four raw CSV tables.
    pub data_dir: PathBuf,

    /// File names of the raw tables, relative to `data_dir`.
    pub inputs: InputFiles,

    /// Parquet snapshot written by the transform and read by the dashboard.
    pub snapshot_path: PathBuf,

    /// DuckDB database file loaded by the transform.
    pub store_path: PathBuf,

    /// Table name inside the DuckDB store.
    pub table_name: String,

    pub dashboard: DashboardSettings,
}

/// Raw input file names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub deals: String,
    pub accounts: String,
    pub products: String,
    pub teams: String,
}

/// Presentation settings for the rendered dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub title: String,
    /// Fill color of the funnel bars.
    pub funnel_color: String,
    /// Stroke color of the trend line.
    pub trend_color: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            data_dir: PathBuf::from("data"),
            inputs: InputFiles::default(),
            snapshot_path: PathBuf::from("data").join("pipeline.parquet"),
            store_path: PathBuf::from("crm.duckdb"),
            table_name: "pipeline".to_string(),
            dashboard: DashboardSettings::default(),
        }
    }
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            deals: "sales_pipeline.csv".to_string(),
            accounts: "accounts.csv".to_string(),
            products: "products.csv".to_string(),
            teams: "sales_teams.csv".to_string(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            title: "CRM Sales Dashboard".to_string(),
            funnel_color: "#38bdf8".to_string(),
            trend_color: "#a78bfa".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load and parse a config file without validating it.
    pub fn from_file(path: &Path) -> Result<Self, crate::ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| crate::ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse_json(&content).map_err(|e| crate::ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Parse config JSON. Missing fields take their defaults.
    pub fn parse_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn deals_path(&self) -> PathBuf {
        self.data_dir.join(&self.inputs.deals)
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.data_dir.join(&self.inputs.accounts)
    }

    pub fn products_path(&self) -> PathBuf {
        self.data_dir.join(&self.inputs.products)
    }

    pub fn teams_path(&self) -> PathBuf {
        self.data_dir.join(&self.inputs.teams)
    }
}
