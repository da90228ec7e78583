//! Inline SVG charts.
//!
//! Both charts are emitted as self-contained `<svg>` elements so the page
//! needs no script or external asset.

use std::fmt::Write;

use crm_common::format::currency_rounded;

use crate::page::{FunnelBar, TrendBucket};

pub const WIDTH: f64 = 640.0;

const FUNNEL_LABEL_WIDTH: f64 = 110.0;
const FUNNEL_ROW: f64 = 44.0;
const FUNNEL_GAP: f64 = 6.0;
const MIN_BAR: f64 = 2.0;

const TREND_HEIGHT: f64 = 320.0;
const TREND_LEFT: f64 = 84.0;
const TREND_RIGHT: f64 = 20.0;
const TREND_TOP: f64 = 16.0;
const TREND_BOTTOM: f64 = 40.0;
const Y_TICKS: usize = 4;
const MAX_X_LABELS: usize = 12;

pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn open_svg(out: &mut String, height: f64, label: &str) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" role="img" aria-label="{}">"#,
        escape(label)
    );
}

/// Horizontal funnel: one centred bar per stage, widths proportional to
/// value, in the order given.
pub fn funnel_svg(bars: &[FunnelBar], color: &str) -> String {
    let height = bars.len() as f64 * (FUNNEL_ROW + FUNNEL_GAP);
    let plot = WIDTH - FUNNEL_LABEL_WIDTH;
    let center = FUNNEL_LABEL_WIDTH + plot / 2.0;
    let max = bars.iter().map(|b| b.total).fold(0.0, f64::max);
    let color = escape(color);

    let mut out = String::new();
    open_svg(&mut out, height, "Pipeline funnel");
    for (i, bar) in bars.iter().enumerate() {
        let y = i as f64 * (FUNNEL_ROW + FUNNEL_GAP);
        let w = if max > 0.0 {
            (plot * bar.total.max(0.0) / max).max(MIN_BAR)
        } else {
            MIN_BAR
        };
        let mid = y + FUNNEL_ROW / 2.0;
        let _ = write!(
            out,
            r#"<rect x="{:.2}" y="{y:.2}" width="{w:.2}" height="{FUNNEL_ROW:.2}" fill="{color}" />"#,
            center - w / 2.0
        );
        let _ = write!(
            out,
            r#"<text x="{:.2}" y="{mid:.2}" text-anchor="end" dominant-baseline="middle" class="axis">{}</text>"#,
            FUNNEL_LABEL_WIDTH - 8.0,
            escape(&bar.stage)
        );
        let _ = write!(
            out,
            r#"<text x="{center:.2}" y="{mid:.2}" text-anchor="middle" dominant-baseline="middle" class="bar-value">{}</text>"#,
            escape(&currency_rounded(bar.total))
        );
    }
    out.push_str("</svg>");
    out
}

/// Tick step of 1, 2 or 5 times a power of ten covering `span` in about
/// [`Y_TICKS`] steps.
fn nice_step(span: f64) -> f64 {
    if span <= 0.0 || !span.is_finite() {
        return 1.0;
    }
    let raw = span / Y_TICKS as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let norm = raw / magnitude;
    let factor = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Line chart of monthly totals with a currency value axis.
pub fn trend_svg(points: &[TrendBucket], color: &str) -> String {
    let plot_w = WIDTH - TREND_LEFT - TREND_RIGHT;
    let plot_h = TREND_HEIGHT - TREND_TOP - TREND_BOTTOM;

    let lo = points.iter().map(|p| p.total).fold(0.0, f64::min);
    let hi = points.iter().map(|p| p.total).fold(0.0, f64::max);
    let step = nice_step(hi - lo);
    let y_min = (lo / step).floor() * step;
    let y_max = ((hi / step).ceil() * step).max(y_min + step);

    let x_at = |i: usize| {
        if points.len() <= 1 {
            TREND_LEFT + plot_w / 2.0
        } else {
            TREND_LEFT + plot_w * i as f64 / (points.len() - 1) as f64
        }
    };
    let y_at = |v: f64| TREND_TOP + plot_h * (1.0 - (v - y_min) / (y_max - y_min));
    let color = escape(color);

    let mut out = String::new();
    open_svg(&mut out, TREND_HEIGHT, "Monthly won revenue");

    let mut tick = y_min;
    while tick <= y_max + step / 2.0 {
        let y = y_at(tick);
        let _ = write!(
            out,
            r#"<line x1="{TREND_LEFT:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" class="grid" />"#,
            TREND_LEFT + plot_w
        );
        let _ = write!(
            out,
            r#"<text x="{:.2}" y="{y:.2}" text-anchor="end" dominant-baseline="middle" class="axis">{}</text>"#,
            TREND_LEFT - 8.0,
            escape(&currency_rounded(tick))
        );
        tick += step;
    }

    let every = points.len().div_ceil(MAX_X_LABELS).max(1);
    for (i, p) in points.iter().enumerate() {
        if i % every == 0 || i + 1 == points.len() {
            let _ = write!(
                out,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" class="axis">{}</text>"#,
                x_at(i),
                TREND_HEIGHT - TREND_BOTTOM / 2.0,
                escape(&p.label)
            );
        }
    }

    let coords: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:.2},{:.2}", x_at(i), y_at(p.total)))
        .collect();
    let _ = write!(
        out,
        r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="2" />"#,
        coords.join(" ")
    );
    for (i, p) in points.iter().enumerate() {
        let _ = write!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="3" fill="{color}"><title>{}: {}</title></circle>"#,
            x_at(i),
            y_at(p.total),
            escape(&p.label),
            escape(&currency_rounded(p.total))
        );
    }
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn bar(stage: &str, total: f64) -> FunnelBar {
        FunnelBar {
            stage: stage.into(),
            total,
        }
    }

    fn bucket(label: &str, total: f64) -> TrendBucket {
        TrendBucket {
            label: label.into(),
            total,
        }
    }

    #[test]
    fn funnel_has_one_bar_per_stage_in_order() {
        let svg = funnel_svg(&[bar("Engaging", 300.0), bar("Won", 150.0)], "#38bdf8");
        assert_eq!(svg.matches("<rect").count(), 2);
        let engaging = svg.find(">Engaging<").unwrap();
        let won = svg.find(">Won<").unwrap();
        assert!(engaging < won);
        assert!(svg.contains(r##"fill="#38bdf8""##));
        assert!(svg.contains("$150"));
    }

    #[test]
    fn widest_bar_spans_plot() {
        let svg = funnel_svg(&[bar("Won", 100.0), bar("Lost", 50.0)], "red");
        let widths: Vec<f64> = Regex::new(r#"<rect x="[^"]+" y="[^"]+" width="([0-9.]+)""#)
            .unwrap()
            .captures_iter(&svg)
            .map(|c| c[1].parse().unwrap())
            .collect();
        assert_eq!(widths, vec![WIDTH - FUNNEL_LABEL_WIDTH, (WIDTH - FUNNEL_LABEL_WIDTH) / 2.0]);
    }

    #[test]
    fn zero_totals_still_draw() {
        let svg = funnel_svg(&[bar("Prospecting", 0.0)], "red");
        assert!(svg.contains(r#"width="2.00""#));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = funnel_svg(&[bar("<script>", 1.0)], "\"red\"");
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;"));
        assert!(svg.contains("&quot;red&quot;"));
    }

    #[test]
    fn trend_axis_is_currency() {
        let svg = trend_svg(
            &[bucket("2024-01", 1200.0), bucket("2024-02", 0.0), bucket("2024-03", 4800.0)],
            "#a78bfa",
        );
        assert!(svg.contains(">$0<"));
        assert!(svg.contains(">$4,000<"));
        assert!(svg.contains(">$6,000<"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains(">2024-02<"));
    }

    #[test]
    fn single_point_is_centred() {
        let svg = trend_svg(&[bucket("2024-01", 100.0)], "red");
        let cx = TREND_LEFT + (WIDTH - TREND_LEFT - TREND_RIGHT) / 2.0;
        assert!(svg.contains(&format!(r#"cx="{cx:.2}""#)));
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(4800.0), 2000.0);
        assert_eq!(nice_step(100.0), 50.0);
        assert_eq!(nice_step(0.0), 1.0);
        assert_eq!(nice_step(4.0), 1.0);
    }
}
