//! CLI Integration Tests
//!
//! These tests verify the CLI commands work correctly end-to-end.
//! They test the "wiring" between the CLI and the core library.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Create a CLI command with a clean LOGGED_* environment
fn cli_cmd() -> Command {
    let mut cmd = Command::cargo_bin("logged").expect("Failed to find logged binary");
    cmd.env_remove("LOGGED_FORMAT")
        .env_remove("LOGGED_DEBUG")
        .env_remove("LOGGED_DEFAULTS");
    cmd
}

/// Parse every stdout line as JSON
fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid JSON line"))
        .collect()
}

// ============================================================================
// Demo Command Tests
// ============================================================================

#[test]
fn test_demo_without_debug() {
    let output = cli_cmd().arg("demo").output().unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["message"], "an info message");
    assert_eq!(lines[0]["data"]["app_name"], "fldsmdfr");
    assert_eq!(lines[1]["data"]["some_number"], "111");
}

#[test]
fn test_demo_with_debug_wildcard() {
    let output = cli_cmd().args(["--debug", "*", "demo"]).output().unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2]["level"], "debug");
    assert_eq!(lines[3]["data"]["some_date"], "Tue Apr 11 11:47:48 EDT 2017");
}

#[test]
fn test_demo_debug_scope_from_env() {
    let output = cli_cmd()
        .env("LOGGED_DEBUG", "logged")
        .arg("demo")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(json_lines(&output.stdout).len(), 4);

    let output = cli_cmd()
        .env("LOGGED_DEBUG", "not_this_crate")
        .arg("demo")
        .output()
        .unwrap();
    assert_eq!(json_lines(&output.stdout).len(), 2);
}

// ============================================================================
// Emit Command Tests
// ============================================================================

#[test]
fn test_emit_info_with_defaults() {
    let output = cli_cmd()
        .args(["--default", "app=x", "emit", "info", "started", "b=2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["level"], "info");
    assert_eq!(lines[0]["message"], "started");
    assert_eq!(lines[0]["data"], serde_json::json!({"app": "x", "b": "2"}));
    assert!(!lines[0]["timestamp"].as_str().unwrap().is_empty());
}

#[test]
fn test_emit_escapes_message() {
    let output = cli_cmd()
        .args(["emit", "error", "quote \" slash \\ tab \t"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines = json_lines(&output.stdout);
    assert_eq!(lines[0]["level"], "error");
    assert_eq!(lines[0]["message"], "quote \" slash \\ tab \t");
    assert!(lines[0].get("data").is_none());
}

#[test]
fn test_emit_text_format() {
    cli_cmd()
        .args(["--format", "text", "emit", "info", "hello", "k=v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[info] hello k=v"));
}

#[test]
fn test_emit_to_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("logs").join("app.jsonl");

    for message in ["first", "second"] {
        cli_cmd()
            .arg("--output")
            .arg(&path)
            .args(["emit", "info", message])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let lines = json_lines(content.as_bytes());
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["message"], "second");
}

#[test]
fn test_emit_rejects_bad_arguments() {
    cli_cmd()
        .args(["emit", "warn", "message"])
        .assert()
        .failure();

    cli_cmd()
        .args(["emit", "info", "message", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));

    cli_cmd()
        .args(["--format", "xml", "emit", "info", "message"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_env_config_fails() {
    cli_cmd()
        .env("LOGGED_FORMAT", "xml")
        .args(["emit", "info", "message"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOGGED_"));
}
