//! Integration tests for the hiit binary.
//!
//! These tests verify end-to-end behavior including:
//! - User management
//! - Session planning and launch warnings
//! - Session recording and statistics
//! - Data reset

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI bound to a data directory, never reading the real config
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("hiit"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(dir.join("config.toml"));
    cmd
}

fn add_user(dir: &Path, name: &str) {
    cli(dir).args(["users", "add", name]).assert().success();
}

fn write_config(dir: &Path, contents: &str) {
    fs::write(dir.join("config.toml"), contents).expect("Failed to write config");
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("hiit"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("HIIT workout companion"));
}

#[test]
fn test_add_and_list_users() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");
    add_user(temp_dir.path(), "Ben");

    cli(temp_dir.path())
        .args(["users", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Ana").and(predicate::str::contains("* Ben")));

    assert!(temp_dir.path().join("data/users.json").exists());
}

#[test]
fn test_duplicate_user_rejected() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");

    cli(temp_dir.path())
        .args(["users", "add", "ana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DuplicateUser"));
}

#[test]
fn test_plan_without_users_is_blocked() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user selected"));
}

#[test]
fn test_plan_lists_steps() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");

    cli(temp_dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("HIIT SESSION")
                .and(predicate::str::contains("16m 20s"))
                .and(predicate::str::contains("With: Ana"))
                .and(predicate::str::contains("Get ready")),
        );
}

#[test]
fn test_plan_shows_sides_of_one_sided_exercises() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");
    write_config(
        temp_dir.path(),
        r#"
[workout]
work_periods_per_cycle = 4
cycles = 1
categories = ["lunge"]
"#,
    );

    cli(temp_dir.path())
        .arg("plan")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Side lunge (side 1)")
                .and(predicate::str::contains("Side lunge (side 2)")),
        );
}

#[test]
fn test_plan_warns_when_exercises_repeat() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");
    write_config(
        temp_dir.path(),
        r#"
[workout]
categories = ["squat"]
"#,
    );

    cli(temp_dir.path())
        .arg("plan")
        .assert()
        .success()
        .stderr(predicate::str::contains("exercises will repeat"));
}

#[test]
fn test_plan_rejects_malformed_countdown() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");
    write_config(
        temp_dir.path(),
        r#"
[workout]
rest_period_ms = 2000
period_countdown_ms = 5000
"#,
    );

    cli(temp_dir.path())
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("period countdown"));
}

#[test]
fn test_complete_records_session() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");
    add_user(temp_dir.path(), "Ben");

    cli(temp_dir.path())
        .arg("complete")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session recorded for 2 user(s)"));

    let log = fs::read_to_string(temp_dir.path().join("data/sessions.jsonl"))
        .expect("Failed to read session log");
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("user_ids"));
}

#[test]
fn test_stats_after_sessions() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");
    add_user(temp_dir.path(), "Ben");

    cli(temp_dir.path()).arg("complete").assert().success();
    cli(temp_dir.path())
        .args(["users", "select", "Ana"])
        .assert()
        .success();
    cli(temp_dir.path()).arg("complete").assert().success();

    cli(temp_dir.path())
        .args(["stats", "--user", "Ana"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Sessions:           2")
                .and(predicate::str::contains("Current streak:     1 day(s)"))
                .and(predicate::str::contains("Sessions per week:  2")),
        );

    cli(temp_dir.path())
        .args(["stats", "--user", "Ben"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sessions:           1"));
}

#[test]
fn test_stats_unknown_user() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");

    cli(temp_dir.path())
        .args(["stats", "--user", "Zed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnknownUser"));
}

#[test]
fn test_select_unknown_user_fails() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");

    cli(temp_dir.path())
        .args(["users", "select", "Zed"])
        .assert()
        .failure();

    cli(temp_dir.path())
        .args(["users", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* Ana"));
}

#[test]
fn test_remove_user_drops_their_sessions() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");
    cli(temp_dir.path()).arg("complete").assert().success();

    cli(temp_dir.path())
        .args(["users", "remove", "Ana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 session(s)"));

    let log = fs::read_to_string(temp_dir.path().join("data/sessions.jsonl"))
        .expect("Failed to read session log");
    assert!(log.is_empty());
}

#[test]
fn test_reset_requires_confirmation() {
    let temp_dir = setup_test_dir();
    add_user(temp_dir.path(), "Ana");
    cli(temp_dir.path()).arg("complete").assert().success();

    cli(temp_dir.path()).arg("reset").assert().failure();
    assert!(temp_dir.path().join("data/sessions.jsonl").exists());

    cli(temp_dir.path())
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data deleted"));

    assert!(!temp_dir.path().join("data/sessions.jsonl").exists());
    assert!(!temp_dir.path().join("data/users.json").exists());
}
