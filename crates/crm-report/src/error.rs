//! Error types for report rendering.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("minified output is not UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReportError> for crm_common::Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Io(e) => crm_common::Error::Io(e),
            other => crm_common::Error::Render(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
