//! CRM pipeline configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the pipeline config file
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - Config snapshots for run summaries

pub mod pipeline;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use pipeline::{DashboardSettings, InputFiles, PipelineConfig};
pub use resolve::{resolve_config, ConfigError, ConfigPaths, ConfigSource, ResolvedConfig};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CRM_CONFIG";

/// Directory name under the platform config dir.
pub const APP_DIR: &str = "crm_pipeline";

/// Config file name looked up inside [`APP_DIR`].
pub const CONFIG_FILE_NAME: &str = "config.json";
