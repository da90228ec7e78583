//! CRM pipeline core: transform stage, dashboard view model, and CLI plumbing.
//!
//! The two stages are exposed as pure functions so they can be exercised
//! without files or a UI:
//! - [`transform::transform`] turns raw tables into the joined dataset.
//! - [`dashboard::render_view`] turns a snapshot and a filter selection into
//!   a view model.
//!
//! Everything with side effects (CSV loading, Parquet/DuckDB persistence,
//! snapshot loading, HTML output) wraps those two functions.

pub mod batch;
pub mod cli;
pub mod dashboard;
pub mod exit_codes;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod transform;

pub use dashboard::{render_view, FilterSelection, Snapshot, ViewModel};
pub use exit_codes::ExitCode;
pub use ingest::{LoadError, RawSources};
pub use model::{Account, Deal, JoinedDeal, Product, SalesTeam};
pub use transform::{transform, JoinedDataset, TransformError};
