//! CLI surface tests for the cw-core binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the cw-core binary.
fn cw_core() -> Command {
    Command::cargo_bin("cw-core").unwrap()
}

#[test]
fn help_flag_works() {
    cw_core()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Citywatch"));
}

#[test]
fn help_shows_all_commands() {
    cw_core()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("detect"))
        .stdout(predicate::str::contains("summary"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn no_args_shows_help_and_fails() {
    cw_core().assert().failure();
}

#[test]
fn check_prints_resolved_settings_as_json() {
    let out = cw_core().arg("check").assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["detector"]["n_trees"], 100);
    assert_eq!(value["window"]["hours"], 6);
}

#[test]
fn check_rejects_invalid_settings_with_config_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"detector": {"n_trees": 0, "sample_size": 256, "contamination": 0.1, "random_state": null}}"#).unwrap();

    cw_core()
        .arg("check")
        .arg("--settings")
        .arg(&path)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("n_trees"));
}

#[test]
fn simulate_then_summary_round_trips_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("traffic.db");

    cw_core()
        .args(["simulate", "--ticks", "3", "--seed", "7"])
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""appended":12"#));

    let out = cw_core()
        .arg("summary")
        .arg("--db")
        .arg(&db)
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["count"], 12);
}

#[test]
fn detect_on_fresh_store_reports_empty_window() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("traffic.db");

    let out = cw_core()
        .args(["detect", "--seed", "0"])
        .arg("--db")
        .arg(&db)
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["evaluated"], 0);
    assert_eq!(value["threshold"], serde_json::Value::Null);
}

#[test]
fn detect_exports_csv_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("traffic.db");
    let csv = dir.path().join("anomalies.csv");

    cw_core()
        .args(["simulate", "--ticks", "5", "--seed", "3"])
        .arg("--db")
        .arg(&db)
        .assert()
        .success();

    cw_core()
        .args(["detect", "--seed", "3"])
        .arg("--db")
        .arg(&db)
        .arg("--export")
        .arg(&csv)
        .assert()
        .success();

    let text = std::fs::read_to_string(&csv).unwrap();
    assert!(text.starts_with("timestamp,location,traffic_volume,avg_speed,anomaly_score"));
}

#[test]
fn detect_exports_csv_to_stdout_with_dash() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("traffic.db");

    cw_core()
        .args(["simulate", "--ticks", "2", "--seed", "4"])
        .arg("--db")
        .arg(&db)
        .assert()
        .success();

    let out = cw_core()
        .args(["detect", "--seed", "4", "--export", "-"])
        .arg("--db")
        .arg(&db)
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    // CSV replaces the JSON payload on stdout.
    assert!(stdout.starts_with("timestamp,location,traffic_volume,avg_speed,anomaly_score"));
    assert!(!stdout.contains('{'));
}
