//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a scratch directory
//! so configuration never touches the real user profile.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &std::path::Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_emotilearn"))
        .args(args)
        .env("HOME", home)
        .env_remove("EMOTILEARN_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("stdout is JSON")
}

#[test]
fn test_quiz_bored_selects_hard_question() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["quiz", "--emotion", "bored"]);
    assert_eq!(code, 0);

    let value = json(&stdout);
    let questions = value["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0]["difficulty"], "hard");
    assert_eq!(value["fell_back"], false);
}

#[test]
fn test_quiz_rejects_unknown_emotion() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["quiz", "--emotion", "ecstatic"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("ecstatic"));
}

#[test]
fn test_quiz_custom_catalog_falls_back() {
    let home = tempfile::tempdir().unwrap();
    let catalog = home.path().join("catalog.toml");
    std::fs::write(
        &catalog,
        r#"
[[question]]
id = 1
prompt = "2 + 2?"
options = ["3", "4"]
correct_index = 1
difficulty = "easy"
"#,
    )
    .unwrap();

    let (stdout, _, code) = run_cli(
        home.path(),
        &["quiz", "--emotion", "bored", "--catalog", catalog.to_str().unwrap()],
    );
    assert_eq!(code, 0);
    let value = json(&stdout);
    assert_eq!(value["fell_back"], true);
    assert_eq!(value["questions"].as_array().unwrap().len(), 1);
}

#[test]
fn test_simulate_frustrated_reaches_meditation() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &["simulate", "--emotions", "frustrated", "--ticks", "5"],
    );
    assert_eq!(code, 0);

    let value = json(&stdout);
    assert_eq!(value["snapshot"]["current_mode"], "meditation");
    assert_eq!(value["snapshot"]["session"]["elapsed_secs"], 5);
    assert_eq!(value["snapshot"]["session"]["active"], false);

    let types: Vec<&str> = value["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["type"].as_str())
        .collect();
    assert_eq!(types.first(), Some(&"SessionStarted"));
    assert!(types.contains(&"ModeChanged"));
    assert_eq!(types.last(), Some(&"SessionStopped"));
}

#[test]
fn test_simulate_oscillation_stays_on_dashboard() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &[
            "simulate",
            "--emotions",
            "frustrated,happy,frustrated,happy",
            "--ticks",
            "4",
            "--interval-ms",
            "1000",
        ],
    );
    assert_eq!(code, 0);
    assert_eq!(json(&stdout)["snapshot"]["current_mode"], "dashboard");
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        home.path(),
        &["config", "set", "transitions.quiz_delay_ms", "900"],
    );
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "transitions.quiz_delay_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "900");
    assert!(home.path().join(".config/emotilearn/config.toml").exists());
}

#[test]
fn test_config_rejects_invalid_duration() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["config", "set", "meditation.default_duration_secs", "45"],
    );
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_config_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "session.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("session.nope"));
}

#[test]
fn test_config_list_is_json() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0);
    let value = json(&stdout);
    assert_eq!(value["session"]["sample_interval_ms"], 3000);
}
