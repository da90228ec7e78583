//! Error types for the CRM pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the CRM pipeline.
///
/// Crate-specific errors convert into one of these variants at the CLI
/// boundary so that every failure maps to a stable exit code.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config file {path}: {reason}")]
    InvalidConfigFile { path: String, reason: String },

    // Input errors (20-29)
    #[error("failed to load {table} from {path}: {reason}")]
    Load {
        table: String,
        path: String,
        reason: String,
    },

    #[error("invalid filter selection: {0}")]
    InvalidSelection(String),

    // Persistence errors (30-39)
    #[error("failed to persist pipeline output: {0}")]
    Persist(String),

    // Presentation errors (40-49)
    #[error("snapshot not available at {path}: {reason}")]
    SnapshotUnavailable { path: String, reason: String },

    #[error("render failed: {0}")]
    Render(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfigFile { .. } => 11,
            Error::Load { .. } => 20,
            Error::InvalidSelection(_) => 21,
            Error::Persist(_) => 30,
            Error::SnapshotUnavailable { .. } => 40,
            Error::Render(_) => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_grouped_by_category() {
        assert_eq!(Error::Config("x".into()).code(), 10);
        let load = Error::Load {
            table: "accounts".into(),
            path: "data/accounts.csv".into(),
            reason: "missing".into(),
        };
        assert_eq!(load.code(), 20);
        assert_eq!(Error::Persist("disk full".into()).code(), 30);
        let snap = Error::SnapshotUnavailable {
            path: "data/pipeline.parquet".into(),
            reason: "not found".into(),
        };
        assert_eq!(snap.code(), 40);
    }

    #[test]
    fn load_error_message_names_table_and_path() {
        let err = Error::Load {
            table: "products".into(),
            path: "data/products.csv".into(),
            reason: "No such file or directory".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("products"));
        assert!(msg.contains("data/products.csv"));
    }
}
