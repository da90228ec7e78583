//! `crm dashboard`: filter, aggregate and render.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Args;
use crm_common::{OutputFormat, RunId};
use crm_config::DashboardSettings;
use tracing::info;

use super::{emit, envelope, report_error, resolve, to_json, GlobalOpts};
use crate::dashboard::{render_text, render_view, to_page, FilterSelection, Snapshot, ViewModel};
use crate::exit_codes::ExitCode;

const COMMAND: &str = "dashboard";

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Parquet snapshot to read (defaults to the configured path)
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Deal stage to include; repeat for several (default: all)
    #[arg(long = "stage", value_name = "STAGE")]
    pub stages: Vec<String>,

    /// Sales agent to include; repeat for several (default: all)
    #[arg(long = "agent", value_name = "AGENT")]
    pub agents: Vec<String>,

    /// First close date to include, YYYY-MM-DD (default: earliest observed)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Last close date to include, YYYY-MM-DD (default: latest observed)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Write output to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

fn parse_date_arg(
    flag: &str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, crm_common::Error> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|e| {
                crm_common::Error::InvalidSelection(format!("--{flag} {v:?}: {e}"))
            })
        })
        .transpose()
}

fn render(
    format: OutputFormat,
    view: &ViewModel,
    settings: &DashboardSettings,
    snapshot_path: &Path,
    run_id: &RunId,
) -> Result<String, crm_common::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(&settings.title, view)),
        OutputFormat::Json => {
            let body = serde_json::json!({
                "snapshot_path": snapshot_path,
                "view": view,
            });
            to_json(&envelope(COMMAND, run_id, body))
        }
        OutputFormat::Html => Ok(crm_report::render_dashboard(&to_page(view, settings, run_id))?),
    }
}

/// Blocking error state: an error page in HTML mode, otherwise the usual
/// error report.
fn unavailable(
    global: &GlobalOpts,
    args: &DashboardArgs,
    settings: &DashboardSettings,
    run_id: &RunId,
    err: crm_common::Error,
) -> ExitCode {
    let code = report_error(global.format, COMMAND, run_id, &err);
    if global.format == OutputFormat::Html {
        let page = crm_report::render_error_page(&settings.title, &err.to_string())
            .map_err(crm_common::Error::from)
            .and_then(|html| emit(args.out.as_deref(), &html));
        if let Err(e) = page {
            tracing::error!(error = %e, "failed to write error page");
        }
    }
    code
}

fn execute(
    global: &GlobalOpts,
    args: &DashboardArgs,
    snapshot: &Snapshot,
    snapshot_path: &Path,
    settings: &DashboardSettings,
    run_id: &RunId,
) -> Result<(), crm_common::Error> {
    let from = parse_date_arg("from", args.from.as_deref())?;
    let to = parse_date_arg("to", args.to.as_deref())?;
    let selection =
        FilterSelection::narrowed(&snapshot.options(), &args.stages, &args.agents, from, to)?;

    let view = render_view(snapshot, &selection);
    info!(
        %run_id,
        filtered = view.filtered_rows,
        total = view.total_rows,
        "dashboard view computed"
    );
    let rendered = render(global.format, &view, settings, snapshot_path, run_id)?;
    emit(args.out.as_deref(), &rendered)
}

pub fn run_dashboard(global: &GlobalOpts, args: &DashboardArgs) -> ExitCode {
    let run_id = RunId::new();
    let config = match resolve(global) {
        Ok(resolved) => resolved.config,
        Err(e) => return report_error(global.format, COMMAND, &run_id, &e),
    };
    let snapshot_path = args
        .snapshot
        .clone()
        .unwrap_or_else(|| config.snapshot_path.clone());

    let snapshot = match Snapshot::load(&snapshot_path) {
        Ok(s) => s,
        Err(e) => return unavailable(global, args, &config.dashboard, &run_id, e.into()),
    };

    match execute(global, args, &snapshot, &snapshot_path, &config.dashboard, &run_id) {
        Ok(()) => ExitCode::Clean,
        Err(e) => report_error(global.format, COMMAND, &run_id, &e),
    }
}
