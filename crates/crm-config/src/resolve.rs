//! Config resolution: CLI → env → XDG → defaults.
//!
//! An explicitly named file (flag or environment variable) must exist; the
//! XDG location is optional and silently skipped when absent.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pipeline::PipelineConfig;
use crate::validate::{validate, ValidationError};
use crate::{APP_DIR, CONFIG_ENV, CONFIG_FILE_NAME, CONFIG_SCHEMA_VERSION};

/// Errors from config loading and resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported config schema version {found} (expected {expected})")]
    UnsupportedVersion { found: String, expected: String },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl From<ConfigError> for crm_common::Error {
    fn from(err: ConfigError) -> Self {
        match &err {
            ConfigError::NotFound(path)
            | ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. } => crm_common::Error::InvalidConfigFile {
                path: path.display().to_string(),
                reason: err.to_string(),
            },
            ConfigError::UnsupportedVersion { .. } | ConfigError::Invalid(_) => {
                crm_common::Error::Config(err.to_string())
            }
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli(PathBuf),
    Env(PathBuf),
    Xdg(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Cli(p) | ConfigSource::Env(p) | ConfigSource::Xdg(p) => Some(p),
            ConfigSource::Defaults => None,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Cli(p) => write!(f, "cli:{}", p.display()),
            ConfigSource::Env(p) => write!(f, "env:{}", p.display()),
            ConfigSource::Xdg(p) => write!(f, "xdg:{}", p.display()),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

/// Candidate config locations, in priority order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub explicit: Option<PathBuf>,
    pub env: Option<PathBuf>,
    pub xdg_dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Collect candidates from the process environment.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            env: std::env::var_os(CONFIG_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            xdg_dir: dirs::config_dir().map(|d| d.join(APP_DIR)),
        }
    }

    /// Pick the highest-priority source without reading it.
    pub fn select(&self) -> Result<ConfigSource, ConfigError> {
        if let Some(p) = &self.explicit {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.clone()));
            }
            return Ok(ConfigSource::Cli(p.clone()));
        }
        if let Some(p) = &self.env {
            if !p.exists() {
                return Err(ConfigError::NotFound(p.clone()));
            }
            return Ok(ConfigSource::Env(p.clone()));
        }
        if let Some(dir) = &self.xdg_dir {
            let p = dir.join(CONFIG_FILE_NAME);
            if p.is_file() {
                return Ok(ConfigSource::Xdg(p));
            }
        }
        Ok(ConfigSource::Defaults)
    }
}

/// A loaded, validated configuration together with its origin.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: PipelineConfig,
    pub source: ConfigSource,
}

impl ResolvedConfig {
    pub fn using_defaults(&self) -> bool {
        self.source == ConfigSource::Defaults
    }
}

/// Resolve, load and validate the effective configuration.
pub fn resolve_config(paths: &ConfigPaths) -> Result<ResolvedConfig, ConfigError> {
    let source = paths.select()?;
    let config = match source.path() {
        Some(p) => PipelineConfig::from_file(p)?,
        None => PipelineConfig::default(),
    };

    if !major_version_matches(&config.schema_version) {
        return Err(ConfigError::UnsupportedVersion {
            found: config.schema_version.clone(),
            expected: CONFIG_SCHEMA_VERSION.to_string(),
        });
    }

    validate(&config)?;
    Ok(ResolvedConfig { config, source })
}

fn major_version_matches(version: &str) -> bool {
    let major = |v: &str| v.split('.').next().and_then(|s| s.parse::<u32>().ok());
    major(version).is_some() && major(version) == major(CONFIG_SCHEMA_VERSION)
}
