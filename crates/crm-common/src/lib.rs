//! CRM pipeline common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the pipeline crates:
//! - Run identity for transform and dashboard invocations
//! - Snapshot schema versioning
//! - Common error type with stable codes
//! - Output format selection
//! - Number formatting for metric cards and chart axes

pub mod error;
pub mod format;
pub mod id;
pub mod output;
pub mod schema;

pub use error::{Error, Result};
pub use id::RunId;
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
