//! Plain-text rendering of a view model.

use crm_common::format::{currency_rounded, thousands};

use super::view::{Chart, ViewModel};

/// Bar width for the largest funnel stage.
const BAR_WIDTH: usize = 40;

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len.clamp(1, BAR_WIDTH))
}

pub fn render_text(title: &str, view: &ViewModel) -> String {
    let mut out = format!(
        "# {title}\n{} of {} deals selected\n\n",
        thousands(view.filtered_rows as i64),
        thousands(view.total_rows as i64)
    );

    for card in &view.cards {
        out.push_str(&format!("  {:<18} {:>14}\n", card.label, card.value));
    }

    out.push_str("\n## Pipeline Funnel\n");
    match &view.funnel {
        Chart::Data { points } => {
            let max = points.iter().map(|p| p.total).fold(0.0, f64::max);
            for p in points {
                out.push_str(&format!(
                    "  {:<12} {:>14}  {}\n",
                    p.stage,
                    currency_rounded(p.total),
                    bar(p.total, max)
                ));
            }
        }
        Chart::Empty { placeholder } => out.push_str(&format!("  {placeholder}\n")),
    }

    out.push_str("\n## Monthly Won Revenue\n");
    match &view.trend {
        Chart::Data { points } => {
            for p in points {
                out.push_str(&format!("  {}  {:>14}\n", p.month, currency_rounded(p.total)));
            }
        }
        Chart::Empty { placeholder } => out.push_str(&format!("  {placeholder}\n")),
    }
    out
}
