//! Integration tests for the somno binary.
//!
//! These tests verify end-to-end behavior including:
//! - Entry logging and listing
//! - Boundary validation and duplicate-date rejection
//! - Statistics and goals workflows
//! - Snapshot persistence and recovery

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("somno"))
}

/// Log one entry for the given date into the test data dir
fn log_entry(data_dir: &Path, date: &str, bedtime: &str, wake: &str, quality: &str) {
    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--date")
        .arg(date)
        .arg("--bedtime")
        .arg(bedtime)
        .arg("--wake")
        .arg(wake)
        .arg("--quality")
        .arg(quality)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sleep tracking and analysis"));
}

#[test]
fn test_log_creates_snapshot() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--date")
        .arg("2024-03-10")
        .arg("--bedtime")
        .arg("23:00")
        .arg("--wake")
        .arg("07:00")
        .arg("--quality")
        .arg("8")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 8.0h"));

    let snapshot_path = data_dir.join("sleep.json");
    assert!(snapshot_path.exists());

    let contents = fs::read_to_string(&snapshot_path).expect("Failed to read snapshot");
    let snapshot: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(snapshot["entries"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["entries"][0]["date"], "2024-03-10");
    assert_eq!(snapshot["entries"][0]["duration"], 8.0);
}

#[test]
fn test_duplicate_date_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_entry(data_dir, "2024-03-10", "23:00", "07:00", "7");

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--date")
        .arg("2024-03-10")
        .arg("--bedtime")
        .arg("22:00")
        .arg("--wake")
        .arg("06:00")
        .arg("--quality")
        .arg("5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_time_rejected_at_boundary() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--date")
        .arg("2024-03-10")
        .arg("--bedtime")
        .arg("11pm")
        .arg("--wake")
        .arg("07:00")
        .arg("--quality")
        .arg("7")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid time of day"));

    // Nothing was persisted
    assert!(!temp_dir.path().join("sleep.json").exists());
}

#[test]
fn test_out_of_range_quality_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--date")
        .arg("2024-03-10")
        .arg("--bedtime")
        .arg("23:00")
        .arg("--wake")
        .arg("07:00")
        .arg("--quality")
        .arg("11")
        .assert()
        .failure()
        .stderr(predicate::str::contains("quality must be between 1 and 10"));
}

#[test]
fn test_list_shows_entries_newest_first() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_entry(data_dir, "2024-03-09", "23:30", "06:30", "6");
    log_entry(data_dir, "2024-03-10", "23:00", "07:00", "8");

    let output = cli()
        .arg("list")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-10"))
        .stdout(predicate::str::contains("2024-03-09"))
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let pos_10 = text.find("2024-03-10").unwrap();
    let pos_09 = text.find("2024-03-09").unwrap();
    assert!(pos_10 < pos_09, "expected newest entry first");
}

#[test]
fn test_stats_on_empty_store() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Average duration: 0.0 h"))
        .stdout(predicate::str::contains("Current streak:   0 day(s)"));
}

#[test]
fn test_stats_with_entries() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_entry(data_dir, "2024-03-09", "23:00", "07:00", "9");
    log_entry(data_dir, "2024-03-10", "23:00", "06:00", "3");

    cli()
        .arg("stats")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Average duration: 7.5 h"))
        .stdout(predicate::str::contains("Average quality:  6.0 / 10"))
        .stdout(predicate::str::contains("Quality distribution:"));
}

#[test]
fn test_goals_update_persists() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli()
        .arg("goals")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--target")
        .arg("7.5")
        .arg("--reminder")
        .arg("on")
        .assert()
        .success()
        .stdout(predicate::str::contains("Goals updated"));

    // A fresh invocation reads the persisted goals back
    cli()
        .arg("goals")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Target duration:  7.5 h"))
        .stdout(predicate::str::contains("Reminder:         on"));
}

#[test]
fn test_delete_unknown_id_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("delete")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("00000000-0000-0000-0000-000000000000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No entry found"));
}

#[test]
fn test_edit_recomputes_duration() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_entry(data_dir, "2024-03-10", "23:00", "07:00", "7");

    let snapshot: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(data_dir.join("sleep.json")).unwrap(),
    )
    .unwrap();
    let id = snapshot["entries"][0]["id"].as_str().unwrap().to_string();

    cli()
        .arg("edit")
        .arg("--data-dir")
        .arg(data_dir)
        .arg(&id)
        .arg("--bedtime")
        .arg("22:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("9.0h"));

    let snapshot: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(data_dir.join("sleep.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(snapshot["entries"][0]["duration"], 9.0);
    assert_eq!(snapshot["entries"][0]["id"].as_str().unwrap(), id);
}

#[test]
fn test_edit_onto_occupied_date_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_entry(data_dir, "2024-03-10", "23:00", "07:00", "7");
    log_entry(data_dir, "2024-03-11", "23:00", "07:00", "7");

    let snapshot: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(data_dir.join("sleep.json")).unwrap(),
    )
    .unwrap();
    // Entries are date-descending, so [0] is 2024-03-11
    let id = snapshot["entries"][0]["id"].as_str().unwrap().to_string();

    cli()
        .arg("edit")
        .arg("--data-dir")
        .arg(data_dir)
        .arg(&id)
        .arg("--date")
        .arg("2024-03-10")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // Both dates are still distinct on disk
    let snapshot: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(data_dir.join("sleep.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(snapshot["entries"][0]["date"], "2024-03-11");
    assert_eq!(snapshot["entries"][1]["date"], "2024-03-10");
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_entry(data_dir, "2024-03-10", "23:00", "07:00", "7");

    let csv_path = data_dir.join("sleep.csv");
    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--output")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 entries"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert!(contents.starts_with("id,date,bedtime,wake_time,duration,quality,notes"));
    assert!(contents.contains("2024-03-10"));
}

#[test]
fn test_corrupted_snapshot_recovers_to_empty() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(data_dir.join("sleep.json"), "{ not json").unwrap();

    // The store starts fresh rather than failing
    log_entry(data_dir, "2024-03-10", "23:00", "07:00", "7");

    let snapshot: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(data_dir.join("sleep.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(snapshot["entries"].as_array().unwrap().len(), 1);
}
