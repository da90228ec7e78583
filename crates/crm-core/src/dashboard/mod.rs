//! Presentation stage.
//!
//! Load a [`Snapshot`] once, then call [`render_view`] for every filter
//! selection. The resulting [`ViewModel`] is rendered as text, JSON or an
//! HTML page by the CLI.

pub mod filter;
pub mod funnel;
pub mod metrics;
pub mod page;
pub mod snapshot;
pub mod text;
pub mod trend;
pub mod view;

pub use filter::{filter, DateRange, FilterSelection, SelectionError};
pub use funnel::{funnel, FunnelStage};
pub use metrics::Metrics;
pub use page::to_page;
pub use snapshot::{FilterOptions, Snapshot, SnapshotError};
pub use text::render_text;
pub use trend::{monthly_trend, TrendPoint};
pub use view::{render_view, Chart, MetricCard, ViewModel};
