//! CLI E2E tests for the transform and dashboard commands.
//!
//! Validates:
//! - `transform` joins the raw tables and writes the snapshot and store
//! - Re-running `transform` on the same inputs yields identical snapshots
//! - `dashboard --format json` reports metrics, funnel and trend
//! - `dashboard --format html` writes a page with both charts
//! - Filter flags narrow the view; unknown values and bad dates exit 20
//! - A missing snapshot exits 13 and, in HTML mode, writes an error page
//! - A missing input table exits 11 and reports the run ID it logged
//! - `options` lists what the filter controls would offer
//! - `config validate` rejects malformed config files with exit 10

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

const DEALS: &str = "\
opportunity_id,sales_agent,product,account,deal_stage,engage_date,close_date,close_value
D1,Anna Snelling,GTX Basic,Acme,Won,2017-01-05,2017-01-14,100
D2,Moses Frase,MG Special,Globex,Engaging,2017-02-01,,
D3,Anna Snelling,GTX Basic,Acme,Lost,2017-01-10,2017-03-02,0
D4,Moses Frase,MG Special,Globex,Won,2017-02-10,2017-03-20,300
";

const ACCOUNTS: &str = "\
account,sector,year_established,revenue,employees,office_location,subsidiary_of
Acme,technolgy,1999,1200.5,300,United States,
Globex,retail,1985,800.0,120,Japan,
";

const PRODUCTS: &str = "\
product,series,sales_price
GTX Basic,GTX,550
MG Special,MG,55
";

const TEAMS: &str = "\
sales_agent,manager,regional_office
Anna Snelling,Dustin Brinkmann,Central
Moses Frase,Dustin Brinkmann,Central
";

/// Get a Command for the crm binary, isolated from any user config.
fn crm(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("crm");
    cmd.timeout(Duration::from_secs(120))
        .current_dir(home)
        .env("XDG_CONFIG_HOME", home.join("xdg"))
        .env_remove("CRM_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempdir().expect("tempdir");
        let data = dir.path().join("data");
        fs::create_dir_all(&data).expect("create data dir");
        fs::write(data.join("sales_pipeline.csv"), DEALS).expect("write deals");
        fs::write(data.join("accounts.csv"), ACCOUNTS).expect("write accounts");
        fs::write(data.join("products.csv"), PRODUCTS).expect("write products");
        fs::write(data.join("sales_teams.csv"), TEAMS).expect("write teams");
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    fn snapshot(&self) -> PathBuf {
        self.path().join("out").join("pipeline.parquet")
    }

    fn store(&self) -> PathBuf {
        self.path().join("out").join("crm.duckdb")
    }

    fn cmd(&self) -> Command {
        crm(self.path())
    }

    fn transform(&self) -> assert_cmd::assert::Assert {
        let out = self.path().join("out");
        fs::create_dir_all(&out).expect("create out dir");
        self.cmd()
            .arg("transform")
            .arg("--data-dir")
            .arg(self.data_dir())
            .arg("--snapshot")
            .arg(self.snapshot())
            .arg("--store")
            .arg(self.store())
            .assert()
    }

    fn dashboard_json(&self, extra: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(["--format", "json", "dashboard", "--snapshot"])
            .arg(self.snapshot())
            .args(extra)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("parse JSON")
    }
}

// ============================================================================
// Transform
// ============================================================================

#[test]
fn test_transform_writes_snapshot_and_store() {
    let ws = Workspace::new();
    ws.transform()
        .success()
        .code(0)
        .stdout(predicate::str::contains("ETL complete - 4 rows written to"));

    assert!(ws.snapshot().exists(), "snapshot should exist");
    assert!(ws.store().exists(), "store should exist");
    assert!(
        !ws.path().join("out").join("pipeline.parquet.tmp").exists(),
        "staged snapshot should be committed"
    );
}

#[test]
fn test_transform_json_summary() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path().join("out")).unwrap();
    let output = ws
        .cmd()
        .args(["--format", "json", "transform", "--data-dir"])
        .arg(ws.data_dir())
        .arg("--snapshot")
        .arg(ws.snapshot())
        .arg("--store")
        .arg(ws.store())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("parse JSON");
    assert_eq!(json["command"], "transform");
    assert_eq!(json["rows"], 4);
    assert_eq!(json["table"], "pipeline");
    assert!(json.get("schema_version").is_some());
    assert!(json.get("run_id").is_some());
    assert!(json["config"].get("fingerprint").is_some());
}

#[test]
fn test_transform_is_deterministic() {
    let ws = Workspace::new();
    ws.transform().success();
    let first = fs::read(ws.snapshot()).unwrap();
    ws.transform().success();
    let second = fs::read(ws.snapshot()).unwrap();
    assert_eq!(first, second, "same inputs should give identical snapshots");
}

#[test]
fn test_transform_missing_input_exits_11() {
    let ws = Workspace::new();
    fs::remove_file(ws.data_dir().join("products.csv")).unwrap();
    ws.transform()
        .failure()
        .code(11)
        .stderr(predicate::str::contains("products"));
    assert!(!ws.snapshot().exists(), "no snapshot on load failure");
}

#[test]
fn test_transform_error_carries_the_logged_run_id() {
    let ws = Workspace::new();
    fs::remove_file(ws.data_dir().join("accounts.csv")).unwrap();
    let output = ws
        .cmd()
        .args(["--format", "json", "-v", "--log-format", "json", "transform"])
        .arg("--data-dir")
        .arg(ws.data_dir())
        .assert()
        .failure()
        .code(11)
        .get_output()
        .clone();

    let json: Value = serde_json::from_slice(&output.stdout).expect("parse JSON");
    let run_id = json["run_id"].as_str().expect("run_id");
    let logs = String::from_utf8_lossy(&output.stderr);
    assert!(
        logs.lines().any(|l| l.contains("transform started") && l.contains(run_id)),
        "start log should carry {run_id}: {logs}"
    );
}

// ============================================================================
// Dashboard
// ============================================================================

#[test]
fn test_dashboard_json_default_selection() {
    let ws = Workspace::new();
    ws.transform().success();

    let json = ws.dashboard_json(&[]);
    assert_eq!(json["command"], "dashboard");

    let view = &json["view"];
    // D2 has no close date and never matches the date range.
    assert_eq!(view["filtered_rows"], 3);
    assert_eq!(view["total_rows"], 4);

    let metrics = &view["metrics"];
    assert_eq!(metrics["pipeline_total"], 400);
    assert_eq!(metrics["won_revenue"], 400.0);
    assert_eq!(metrics["won_count"], 2);
    // (9 + 38) / 2 = 23.5, rounded half to even
    assert_eq!(metrics["avg_cycle_days"], 24);

    let funnel = &view["funnel"];
    assert_eq!(funnel["kind"], "data");
    let stages: Vec<&str> = funnel["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["stage"].as_str().unwrap())
        .collect();
    assert_eq!(stages, ["Won", "Lost"]);

    let trend = &view["trend"];
    assert_eq!(trend["kind"], "data");
    let months: Vec<(&str, f64)> = trend["points"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["month"].as_str().unwrap(), p["total"].as_f64().unwrap()))
        .collect();
    assert_eq!(
        months,
        [("2017-01", 100.0), ("2017-02", 0.0), ("2017-03", 300.0)]
    );
}

#[test]
fn test_dashboard_filters_narrow_the_view() {
    let ws = Workspace::new();
    ws.transform().success();

    let json = ws.dashboard_json(&["--agent", "Anna Snelling", "--to", "2017-02-28"]);
    let view = &json["view"];
    assert_eq!(view["filtered_rows"], 1);
    assert_eq!(view["metrics"]["conversion_rate"], 100.0);
    assert_eq!(view["metrics"]["avg_cycle_days"], 9);
}

#[test]
fn test_dashboard_empty_selection_uses_placeholders() {
    let ws = Workspace::new();
    ws.transform().success();

    let json = ws.dashboard_json(&["--stage", "Lost", "--to", "2017-01-31"]);
    let view = &json["view"];
    assert_eq!(view["filtered_rows"], 0);
    assert_eq!(view["metrics"]["pipeline_total"], 0);
    assert_eq!(view["funnel"]["kind"], "empty");
    assert_eq!(view["trend"]["kind"], "empty");
}

#[test]
fn test_dashboard_text_shows_cards() {
    let ws = Workspace::new();
    ws.transform().success();

    ws.cmd()
        .arg("dashboard")
        .arg("--snapshot")
        .arg(ws.snapshot())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pipeline $"))
        .stdout(predicate::str::contains("$400"))
        .stdout(predicate::str::contains("66.7%"));
}

#[test]
fn test_dashboard_html_writes_charts() {
    let ws = Workspace::new();
    ws.transform().success();
    let page = ws.path().join("dashboard.html");

    ws.cmd()
        .args(["--format", "html", "dashboard", "--snapshot"])
        .arg(ws.snapshot())
        .arg("--out")
        .arg(&page)
        .assert()
        .success();

    let html = fs::read_to_string(&page).expect("read page");
    assert!(html.starts_with("<!DOCTYPE html>") || html.starts_with("<!doctype html>"));
    assert_eq!(html.matches("<svg").count(), 2, "funnel and trend charts");
    assert!(html.contains("Anna Snelling"));
}

#[test]
fn test_dashboard_unknown_stage_exits_20() {
    let ws = Workspace::new();
    ws.transform().success();

    ws.cmd()
        .arg("dashboard")
        .arg("--snapshot")
        .arg(ws.snapshot())
        .args(["--stage", "Negotiation"])
        .assert()
        .failure()
        .code(20)
        .stderr(predicate::str::contains("Negotiation"));
}

#[test]
fn test_dashboard_bad_date_exits_20() {
    let ws = Workspace::new();
    ws.transform().success();

    let output = ws
        .cmd()
        .args(["--format", "json", "dashboard", "--snapshot"])
        .arg(ws.snapshot())
        .args(["--from", "01/02/2017"])
        .assert()
        .failure()
        .code(20)
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("parse JSON");
    assert_eq!(json["error"]["exit_code"], 20);
    assert_eq!(json["error"]["code"], 21);
}

#[test]
fn test_dashboard_inverted_range_exits_20() {
    let ws = Workspace::new();
    ws.transform().success();

    ws.cmd()
        .arg("dashboard")
        .arg("--snapshot")
        .arg(ws.snapshot())
        .args(["--from", "2017-03-01", "--to", "2017-01-01"])
        .assert()
        .failure()
        .code(20);
}

#[test]
fn test_dashboard_missing_snapshot_exits_13() {
    let dir = tempdir().unwrap();
    crm(dir.path())
        .args(["dashboard", "--snapshot", "nowhere.parquet"])
        .assert()
        .failure()
        .code(13)
        .stderr(predicate::str::contains("nowhere.parquet"));
}

#[test]
fn test_dashboard_missing_snapshot_html_error_page() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("dashboard.html");
    crm(dir.path())
        .args(["--format", "html", "dashboard", "--snapshot", "nowhere.parquet"])
        .arg("--out")
        .arg(&page)
        .assert()
        .failure()
        .code(13);

    let html = fs::read_to_string(&page).expect("error page written");
    assert!(html.contains("nowhere.parquet"));
    assert!(!html.contains("<svg"), "no charts on the error page");
}

// ============================================================================
// Options and config
// ============================================================================

#[test]
fn test_options_json_lists_controls() {
    let ws = Workspace::new();
    ws.transform().success();

    let output = ws
        .cmd()
        .args(["--format", "json", "options", "--snapshot"])
        .arg(ws.snapshot())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("parse JSON");
    assert_eq!(json["rows"], 4);
    let options = &json["options"];
    assert_eq!(
        options["stages"],
        serde_json::json!(["Won", "Engaging", "Lost"])
    );
    assert_eq!(
        options["agents"],
        serde_json::json!(["Anna Snelling", "Moses Frase"])
    );
    assert_eq!(options["close_dates"]["start"], "2017-01-14");
    assert_eq!(options["close_dates"]["end"], "2017-03-20");
}

#[test]
fn test_config_file_drives_paths() {
    let ws = Workspace::new();
    let config = ws.path().join("crm.json");
    let body = serde_json::json!({
        "data_dir": ws.data_dir(),
        "snapshot_path": ws.path().join("configured.parquet"),
        "store_path": ws.path().join("configured.duckdb"),
    });
    fs::write(&config, body.to_string()).unwrap();

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .arg("transform")
        .assert()
        .success();
    assert!(ws.path().join("configured.parquet").exists());
    assert!(ws.path().join("configured.duckdb").exists());
}

#[test]
fn test_config_validate_bad_json_exits_10() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(&config, "{ not json").unwrap();

    crm(dir.path())
        .args(["config", "validate"])
        .arg(&config)
        .assert()
        .failure()
        .code(10);
}

#[test]
fn test_config_show_defaults() {
    let dir = tempdir().unwrap();
    let output = crm(dir.path())
        .args(["--format", "json", "config", "show"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("parse JSON");
    assert_eq!(json["using_defaults"], true);
    assert_eq!(json["config"]["table_name"], "pipeline");
}
