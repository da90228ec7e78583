//! `crm options`: what the filter controls would offer.

use std::path::PathBuf;

use clap::Args;
use crm_common::{OutputFormat, RunId};

use super::{emit, envelope, report_error, resolve, to_json, GlobalOpts};
use crate::dashboard::{FilterOptions, Snapshot};
use crate::exit_codes::ExitCode;

const COMMAND: &str = "options";

#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Parquet snapshot to read (defaults to the configured path)
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,
}

fn render_text(options: &FilterOptions, rows: usize) -> String {
    let mut out = format!("# Filter options ({rows} deals)\n\n");
    out.push_str(&format!("Stages ({}):\n", options.stages.len()));
    for s in &options.stages {
        out.push_str(&format!("  {s}\n"));
    }
    out.push_str(&format!("Sales agents ({}):\n", options.agents.len()));
    for a in &options.agents {
        out.push_str(&format!("  {a}\n"));
    }
    match &options.close_dates {
        Some(range) => out.push_str(&format!("Close dates: {} to {}\n", range.start, range.end)),
        None => out.push_str("Close dates: none\n"),
    }
    out
}

fn execute(
    global: &GlobalOpts,
    args: &OptionsArgs,
    run_id: &RunId,
) -> Result<(), crm_common::Error> {
    let config = resolve(global)?.config;
    let path = args.snapshot.clone().unwrap_or(config.snapshot_path);
    let snapshot = Snapshot::load(&path)?;
    let options = snapshot.options();

    let rendered = match global.format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "snapshot_path": path,
                "rows": snapshot.len(),
                "options": options,
            });
            to_json(&envelope(COMMAND, run_id, body))?
        }
        OutputFormat::Text | OutputFormat::Html => render_text(&options, snapshot.len()),
    };
    emit(None, &rendered)
}

pub fn run_options(global: &GlobalOpts, args: &OptionsArgs) -> ExitCode {
    let run_id = RunId::new();
    match execute(global, args, &run_id) {
        Ok(()) => ExitCode::Clean,
        Err(e) => report_error(global.format, COMMAND, &run_id, &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DateRange;
    use chrono::NaiveDate;

    #[test]
    fn text_lists_every_option() {
        let options = FilterOptions {
            stages: vec!["Won".into(), "Engaging".into()],
            agents: vec!["Moses Frase".into()],
            close_dates: Some(DateRange {
                start: NaiveDate::from_ymd_opt(2017, 3, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2017, 12, 31).unwrap(),
            }),
        };
        let text = render_text(&options, 3);
        assert!(text.contains("Stages (2):\n  Won\n  Engaging\n"));
        assert!(text.contains("  Moses Frase\n"));
        assert!(text.contains("Close dates: 2017-03-01 to 2017-12-31"));
    }
}
