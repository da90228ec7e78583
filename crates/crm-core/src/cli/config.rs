//! `crm config`: inspect and validate configuration.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use crm_common::{OutputFormat, RunId};
use crm_config::{resolve_config, ConfigPaths, ConfigSnapshot, ResolvedConfig};

use super::{emit, envelope, report_error, resolve, to_json, GlobalOpts};
use crate::exit_codes::ExitCode;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration and where it came from
    Show,
    /// Check a config file (or the resolved one) without running anything
    Validate {
        /// Config file to check
        path: Option<PathBuf>,
    },
}

pub fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> ExitCode {
    let run_id = RunId::new();
    let (command, result) = match &args.command {
        ConfigCommands::Show => ("config show", show(global, &run_id)),
        ConfigCommands::Validate { path } => {
            ("config validate", check(global, path.clone(), &run_id))
        }
    };
    match result {
        Ok(()) => ExitCode::Clean,
        Err(e) => report_error(global.format, command, &run_id, &e),
    }
}

fn show(global: &GlobalOpts, run_id: &RunId) -> Result<(), crm_common::Error> {
    let resolved = resolve(global)?;
    let snapshot = ConfigSnapshot::capture(&resolved)?;
    let rendered = match global.format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "source": snapshot.source,
                "using_defaults": resolved.using_defaults(),
                "fingerprint": snapshot.fingerprint,
                "config": snapshot.config,
            });
            to_json(&envelope("config show", run_id, body))?
        }
        OutputFormat::Text | OutputFormat::Html => format!(
            "# Configuration\nsource: {}\nfingerprint: {}\n\n{}",
            snapshot.source,
            snapshot.fingerprint,
            serde_json::to_string_pretty(&snapshot.config)?
        ),
    };
    emit(None, &rendered)
}

fn check(
    global: &GlobalOpts,
    path: Option<PathBuf>,
    run_id: &RunId,
) -> Result<(), crm_common::Error> {
    let resolved: ResolvedConfig = match path {
        Some(p) => resolve_config(&ConfigPaths {
            explicit: Some(p),
            env: None,
            xdg_dir: None,
        })?,
        None => resolve(global)?,
    };
    let rendered = match global.format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "source": resolved.source.to_string(),
                "valid": true,
            });
            to_json(&envelope("config validate", run_id, body))?
        }
        OutputFormat::Text | OutputFormat::Html => {
            format!("config OK ({})", resolved.source)
        }
    };
    emit(None, &rendered)
}
