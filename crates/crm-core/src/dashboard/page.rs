//! Mapping a view model onto the HTML report page.

use chrono::NaiveDate;
use crm_common::RunId;
use crm_config::DashboardSettings;
use crm_report::{Card, DashboardPage, FilterSummary, FunnelBar, Section, TrendBucket};

use super::view::{Chart, ViewModel};

fn section<T, U>(chart: &Chart<T>, map: impl Fn(&T) -> U) -> Section<U> {
    match chart {
        Chart::Data { points } => Section::Chart(points.iter().map(map).collect()),
        Chart::Empty { placeholder } => Section::Placeholder(placeholder.clone()),
    }
}

fn bound(date: NaiveDate) -> Option<String> {
    (date != NaiveDate::MIN && date != NaiveDate::MAX).then(|| date.to_string())
}

pub fn to_page(view: &ViewModel, settings: &DashboardSettings, run_id: &RunId) -> DashboardPage {
    DashboardPage {
        title: settings.title.clone(),
        run_id: run_id.to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        cards: view
            .cards
            .iter()
            .map(|c| Card {
                label: c.label.clone(),
                value: c.value.clone(),
            })
            .collect(),
        funnel: section(&view.funnel, |s| FunnelBar {
            stage: s.stage.clone(),
            total: s.total,
        }),
        trend: section(&view.trend, |p| TrendBucket {
            label: p.month.clone(),
            total: p.total,
        }),
        filters: FilterSummary {
            stages: view.selection.stages.iter().cloned().collect(),
            agents: view.selection.agents.iter().cloned().collect(),
            from: bound(view.selection.close_dates.start),
            to: bound(view.selection.close_dates.end),
            filtered_rows: view.filtered_rows,
            total_rows: view.total_rows,
        },
        funnel_color: settings.funnel_color.clone(),
        trend_color: settings.trend_color.clone(),
    }
}
