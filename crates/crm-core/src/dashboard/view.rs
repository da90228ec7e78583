//! The dashboard view model.
//!
//! [`render_view`] is the whole presentation cycle minus drawing: filter,
//! aggregate, format. It is pure and recomputes everything on every call,
//! so any change to the selection is simply another call.

use crm_common::format::{currency, percent};
use serde::Serialize;

use super::filter::{filter, FilterSelection};
use super::funnel::{funnel, FunnelStage};
use super::metrics::Metrics;
use super::snapshot::Snapshot;
use super::trend::{monthly_trend, TrendPoint};

pub const FUNNEL_PLACEHOLDER: &str = "No data for funnel with current filters.";
pub const TREND_PLACEHOLDER: &str = "No won-revenue in selected period.";

/// A labelled metric card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

/// Chart data, or the message shown in its place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart<T> {
    Data { points: Vec<T> },
    Empty { placeholder: String },
}

impl<T> Chart<T> {
    fn from_points(points: Vec<T>, placeholder: &str) -> Self {
        if points.is_empty() {
            Chart::Empty {
                placeholder: placeholder.to_string(),
            }
        } else {
            Chart::Data { points }
        }
    }

    pub fn points(&self) -> &[T] {
        match self {
            Chart::Data { points } => points,
            Chart::Empty { .. } => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Chart::Data { .. } => None,
            Chart::Empty { placeholder } => Some(placeholder),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub selection: FilterSelection,
    pub metrics: Metrics,
    pub cards: Vec<MetricCard>,
    pub funnel: Chart<FunnelStage>,
    pub trend: Chart<TrendPoint>,
    pub filtered_rows: usize,
    pub total_rows: usize,
}

fn cards(m: &Metrics) -> Vec<MetricCard> {
    let card = |label: &str, value: String| MetricCard {
        label: label.to_string(),
        value,
    };
    vec![
        card("Pipeline $", currency(m.pipeline_total)),
        // Truncated like the pipeline total so both cards agree on one row.
        card("Won Revenue", currency(m.won_revenue.trunc() as i64)),
        card("Conversion %", percent(m.conversion_rate)),
        card("Avg Cycle (days)", m.avg_cycle_days.to_string()),
    ]
}

/// Compute the full view for `selection` over `snapshot`.
pub fn render_view(snapshot: &Snapshot, selection: &FilterSelection) -> ViewModel {
    let rows = filter(snapshot, selection);
    let metrics = Metrics::compute(&rows);
    ViewModel {
        selection: selection.clone(),
        cards: cards(&metrics),
        funnel: Chart::from_points(funnel(&rows), FUNNEL_PLACEHOLDER),
        trend: Chart::from_points(monthly_trend(&rows), TREND_PLACEHOLDER),
        metrics,
        filtered_rows: rows.len(),
        total_rows: snapshot.len(),
    }
}
