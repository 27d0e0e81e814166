//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a scratch data directory and verify
//! outputs and the files left behind.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_choreboard"))
        .args(args)
        .env("CHOREBOARD_DATA_DIR", dir)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("command did not print JSON")
}

#[test]
fn test_chore_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["user", "add", "alice"]);
    let added = run_ok(
        dir.path(),
        &["chore", "add", "Dishes", "--assignee", "alice", "--frequency", "weekly"],
    );
    assert_eq!(added["index"], 0);

    let toggled = run_ok(dir.path(), &["chore", "toggle", "0"]);
    assert_eq!(toggled["completed"], true);

    let users = run_ok(dir.path(), &["user", "list"]);
    assert_eq!(users[0]["points"], 5);

    let saved = std::fs::read_to_string(dir.path().join("chores.json")).unwrap();
    assert!(saved.contains("\"pointsAwarded\": true"));

    run_ok(dir.path(), &["chore", "delete", "0"]);
    let chores = run_ok(dir.path(), &["chore", "list"]);
    assert_eq!(chores, serde_json::json!([]));
}

#[test]
fn test_raw_request_and_status() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["request", "action=add&name=Trash&assignee=bob&frequency=Daily"]);

    let status = run_ok(dir.path(), &["status"]);
    assert_eq!(status["indicator"], "pending");

    let offline = run_ok(dir.path(), &["status", "--offline"]);
    assert_eq!(offline["indicator"], "offline");
}

#[test]
fn test_bad_index_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["chore", "toggle", "3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "{stderr}");
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "points.weekly", "7"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "points.weekly"]);
    assert_eq!(stdout.trim(), "7");

    // Weekly may not exceed monthly.
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "points.weekly", "99"]);
    assert_eq!(code, 1);
}

#[test]
fn test_sweep_with_nothing_due() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["sweep"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("nothing to reset"));
}
