//! Command-line interface for the `crm` binary.

pub mod config;
pub mod dashboard;
pub mod options;
pub mod transform;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use crm_common::{OutputFormat, RunId, SCHEMA_VERSION};
use crm_config::{resolve_config, ConfigPaths, ResolvedConfig};
use tracing::debug;

use crate::exit_codes::ExitCode;
use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "crm",
    version,
    about = "CRM sales pipeline: build the joined snapshot and render the dashboard"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Config file (falls back to $CRM_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the raw CSV tables, join them, and write the snapshot and store
    Transform(transform::TransformArgs),
    /// Render the dashboard for a filter selection
    Dashboard(dashboard::DashboardArgs),
    /// List the stages, agents and close-date bounds available for filtering
    Options(options::OptionsArgs),
    /// Show or validate configuration
    Config(config::ConfigArgs),
}

/// Dispatch a parsed command line.
pub fn run(cli: &Cli) -> ExitCode {
    match &cli.command {
        Commands::Transform(args) => transform::run_transform(&cli.global, args),
        Commands::Dashboard(args) => dashboard::run_dashboard(&cli.global, args),
        Commands::Options(args) => options::run_options(&cli.global, args),
        Commands::Config(args) => config::run_config(&cli.global, args),
    }
}

pub(crate) fn resolve(global: &GlobalOpts) -> Result<ResolvedConfig, crm_common::Error> {
    let resolved = resolve_config(&ConfigPaths::discover(global.config.clone()))?;
    debug!(source = %resolved.source, "configuration resolved");
    Ok(resolved)
}

/// Wrap a command result in the standard JSON envelope.
pub(crate) fn envelope(command: &str, run_id: &RunId, body: serde_json::Value) -> serde_json::Value {
    let mut out = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "command": command,
    });
    if let (Some(map), serde_json::Value::Object(extra)) = (out.as_object_mut(), body) {
        map.extend(extra);
    }
    out
}

/// Write command output to `out` or stdout.
pub(crate) fn emit(out: Option<&Path>, contents: &str) -> Result<(), crm_common::Error> {
    match out {
        Some(path) => {
            crm_report::write_report(path, contents)?;
            debug!(path = %path.display(), "output written");
        }
        None => println!("{}", contents.trim_end_matches('\n')),
    }
    Ok(())
}

pub(crate) fn to_json(value: &serde_json::Value) -> Result<String, crm_common::Error> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Report a failure in the requested format and map it to an exit code.
pub(crate) fn report_error(
    format: OutputFormat,
    command: &str,
    run_id: &RunId,
    err: &crm_common::Error,
) -> ExitCode {
    let code = ExitCode::from(err);
    tracing::error!(command, error = %err, exit_code = code.as_i32(), "command failed");
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "error": {
                    "code": err.code(),
                    "exit_code": code.as_i32(),
                    "message": err.to_string(),
                }
            });
            match serde_json::to_string_pretty(&envelope(command, run_id, body)) {
                Ok(s) => println!("{s}"),
                Err(_) => eprintln!("crm {command}: {err}"),
            }
        }
        OutputFormat::Text | OutputFormat::Html => eprintln!("crm {command}: {err}"),
    }
    code
}
