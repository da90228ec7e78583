//! Page rendering and output.

use std::fs;
use std::path::Path;

use askama::Template;
use minify_html::Cfg;
use tracing::debug;

use crate::charts::{funnel_svg, trend_svg};
use crate::error::Result;
use crate::page::{DashboardPage, Section};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    page: &'a DashboardPage,
    funnel_svg: Option<String>,
    funnel_placeholder: &'a str,
    trend_svg: Option<String>,
    trend_placeholder: &'a str,
    stages: String,
    agents: String,
    dates: String,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate<'a> {
    title: &'a str,
    message: &'a str,
}

fn section_svg<T>(section: &Section<T>, draw: impl Fn(&[T]) -> String) -> (Option<String>, &str) {
    match section {
        Section::Chart(points) => (Some(draw(points)), ""),
        Section::Placeholder(msg) => (None, msg.as_str()),
    }
}

fn joined_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

fn minify(html: &str) -> Result<String> {
    let mut cfg = Cfg::new();
    cfg.minify_css = true;
    cfg.keep_closing_tags = true;
    cfg.do_not_minify_doctype = true;
    let bytes = minify_html::minify(html.as_bytes(), &cfg);
    Ok(String::from_utf8(bytes)?)
}

/// Render the dashboard as a single self-contained, minified HTML page.
pub fn render_dashboard(page: &DashboardPage) -> Result<String> {
    let (funnel_chart, funnel_placeholder) =
        section_svg(&page.funnel, |bars| funnel_svg(bars, &page.funnel_color));
    let (trend_chart, trend_placeholder) =
        section_svg(&page.trend, |points| trend_svg(points, &page.trend_color));

    let dates = match (&page.filters.from, &page.filters.to) {
        (Some(from), Some(to)) => format!("{from} to {to}"),
        _ => "no close dates".to_string(),
    };

    let html = DashboardTemplate {
        page,
        funnel_svg: funnel_chart,
        funnel_placeholder,
        trend_svg: trend_chart,
        trend_placeholder,
        stages: joined_or_none(&page.filters.stages),
        agents: joined_or_none(&page.filters.agents),
        dates,
    }
    .render()?;
    let out = minify(&html)?;
    debug!(raw = html.len(), minified = out.len(), "dashboard rendered");
    Ok(out)
}

/// Render the blocking error state shown when no dashboard can be built.
pub fn render_error_page(title: &str, message: &str) -> Result<String> {
    let html = ErrorTemplate { title, message }.render()?;
    minify(&html)
}

/// Write rendered output via a temp file and rename.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}
