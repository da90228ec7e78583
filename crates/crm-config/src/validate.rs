//! Semantic validation of a parsed config.

use thiserror::Error;

use crate::pipeline::PipelineConfig;

/// A config that parsed but cannot drive a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("input file name for {table} is empty")]
    EmptyInputName { table: &'static str },

    #[error("table name {0:?} is not a plain SQL identifier")]
    InvalidTableName(String),

    #[error("snapshot and store paths must differ (both {0})")]
    OutputCollision(String),

    #[error("dashboard title is empty")]
    EmptyTitle,
}

pub type ValidationResult = Result<(), ValidationError>;

/// Validate a config for use by the transform and dashboard stages.
pub fn validate(config: &PipelineConfig) -> ValidationResult {
    let inputs = [
        ("deals", &config.inputs.deals),
        ("accounts", &config.inputs.accounts),
        ("products", &config.inputs.products),
        ("teams", &config.inputs.teams),
    ];
    for (table, name) in inputs {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyInputName { table });
        }
    }

    if !is_identifier(&config.table_name) {
        return Err(ValidationError::InvalidTableName(config.table_name.clone()));
    }

    if config.snapshot_path == config.store_path {
        return Err(ValidationError::OutputCollision(
            config.snapshot_path.display().to_string(),
        ));
    }

    if config.dashboard.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    Ok(())
}

/// `[A-Za-z_][A-Za-z0-9_]*`, so the name can be interpolated into DDL.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
