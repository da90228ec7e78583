//! Render-ready page data.
//!
//! Everything here is already filtered, aggregated and formatted; the
//! renderer only lays it out.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelBar {
    pub stage: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBucket {
    /// `YYYY-MM`.
    pub label: String,
    pub total: f64,
}

/// A chart, or the message shown instead of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section<T> {
    Chart(Vec<T>),
    Placeholder(String),
}

/// The current state of the filter controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSummary {
    pub stages: Vec<String>,
    pub agents: Vec<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub filtered_rows: usize,
    pub total_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPage {
    pub title: String,
    pub run_id: String,
    pub generated_at: String,
    pub cards: Vec<Card>,
    pub funnel: Section<FunnelBar>,
    pub trend: Section<TrendBucket>,
    pub filters: FilterSummary,
    /// CSS color of the funnel bars.
    pub funnel_color: String,
    /// CSS color of the trend line.
    pub trend_color: String,
}
