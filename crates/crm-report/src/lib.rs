//! HTML dashboard rendering.
//!
//! Takes a fully computed [`DashboardPage`] and produces one self-contained
//! HTML document: metric cards, an SVG funnel and an SVG trend line, with no
//! scripts or external assets. A separate error page covers the case where
//! no snapshot could be loaded.

pub mod charts;
pub mod error;
pub mod page;
pub mod render;

pub use error::{ReportError, Result};
pub use page::{Card, DashboardPage, FilterSummary, FunnelBar, Section, TrendBucket};
pub use render::{render_dashboard, render_error_page, write_report};
