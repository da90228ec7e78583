//! Exit codes for the `crm` CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//! They are stable across releases.

/// Exit codes for crm operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Configuration error
    ConfigError = 10,

    /// An input table is missing or malformed
    LoadError = 11,

    /// Snapshot or analytical store could not be written
    PersistError = 12,

    /// Snapshot missing or unreadable
    SnapshotUnavailable = 13,

    /// Output could not be rendered
    RenderError = 14,

    /// I/O error
    IoError = 15,

    /// Invalid arguments or filter selection
    InvalidSelection = 20,

    /// Internal/unknown error
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&crm_common::Error> for ExitCode {
    fn from(err: &crm_common::Error) -> Self {
        use crm_common::Error;
        match err {
            Error::Config(_) | Error::InvalidConfigFile { .. } => ExitCode::ConfigError,
            Error::Load { .. } => ExitCode::LoadError,
            Error::InvalidSelection(_) => ExitCode::InvalidSelection,
            Error::Persist(_) => ExitCode::PersistError,
            Error::SnapshotUnavailable { .. } => ExitCode::SnapshotUnavailable,
            Error::Render(_) => ExitCode::RenderError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}
