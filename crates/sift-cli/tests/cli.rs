use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::{tempdir, TempDir};

const SIGNALS: &str = r#"[
  {"title": "Session tokens never expire", "kind": "todo", "source": "todos",
   "file_path": "auth/session.rs", "line": 42, "confidence": 0.8, "tags": ["auth"]},
  {"title": "Flaky upload test", "kind": "test-failure", "source": "ci",
   "file_path": "tests/upload.rs", "confidence": 0.6},
  {"title": "Typo in settings page", "kind": "issue", "source": "issues", "confidence": 0.3}
]"#;

#[allow(deprecated)]
fn sift() -> Command {
    let mut cmd = Command::cargo_bin("sift").expect("binary");
    cmd.env_remove("SIFT_CONFIG")
        .env_remove("SIFT_LLM_COMMAND")
        .env_remove("RUST_LOG");
    cmd
}

fn setup() -> TempDir {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("signals.json"), SIGNALS).unwrap();
    temp
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = sift()
        .current_dir(dir)
        .args(["--provider", "none", "--format", "json"])
        .args(args)
        .output()
        .expect("command run");
    assert!(
        output.status.success(),
        "sift failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

#[test]
fn cluster_without_llm_falls_back_to_singletons() {
    let temp = setup();
    let body = run_json(temp.path(), &["cluster", "signals.json"]);

    let clusters = body["clusters"].as_array().unwrap();
    assert_eq!(clusters.len(), 3);
    assert_eq!(clusters[0]["id"], "cluster-0");
    assert_eq!(clusters[0]["name"], "Session tokens never expire");
    assert_eq!(clusters[0]["signal_ids"], serde_json::json!(["sig-0"]));
    assert_eq!(clusters[2]["confidence"], 0.3);
    assert_eq!(body["unclustered"], serde_json::json!([]));
}

#[test]
fn beads_as_signals_round_trip_through_the_bridge() {
    let temp = setup();
    let body = run_json(temp.path(), &["beads", "signals.json", "--as-signals"]);

    let signals = body.as_array().unwrap();
    assert_eq!(signals.len(), 3);
    assert_eq!(signals[0]["title"], "Session tokens never expire");
    assert_eq!(signals[0]["file_path"], "auth/session.rs");
    assert_eq!(signals[0]["line"], 42);
}

#[test]
fn prioritize_applies_cli_overrides_without_llm() {
    let temp = setup();
    let body = run_json(
        temp.path(),
        &["prioritize", "signals.json", "--override", "auth/**=P1"],
    );

    let signals = body.as_array().unwrap();
    assert_eq!(signals[0]["priority"], 1);
    assert!(signals[1].get("priority").is_none());
    assert!(signals[2].get("priority").is_none());
}

#[test]
fn prioritize_rejects_bad_override() {
    let temp = setup();
    sift()
        .current_dir(temp.path())
        .args(["--provider", "none", "prioritize", "signals.json"])
        .args(["--override", "auth/**=7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --override"));
}

#[test]
fn deps_without_llm_is_empty_and_apply_leaves_signals_alone() {
    let temp = setup();
    let deps = run_json(temp.path(), &["deps", "signals.json"]);
    assert_eq!(deps, serde_json::json!([]));

    let applied = run_json(temp.path(), &["deps", "signals.json", "--apply"]);
    let signals = applied.as_array().unwrap();
    assert_eq!(signals.len(), 3);
    assert!(signals.iter().all(|s| s.get("blocks").is_none()));
}

#[test]
fn text_output_lists_clusters() {
    let temp = setup();
    sift()
        .current_dir(temp.path())
        .args(["--provider", "none", "cluster", "signals.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster-1 Flaky upload test"));
}

#[test]
fn missing_signal_file_is_an_error() {
    let temp = tempdir().unwrap();
    sift()
        .current_dir(temp.path())
        .args(["--provider", "none", "cluster", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn command_provider_requires_a_command() {
    let temp = setup();
    sift()
        .current_dir(temp.path())
        .args(["--provider", "command", "cluster", "signals.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--llm-command"));
}

#[test]
fn config_file_overrides_are_used() {
    let temp = setup();
    fs::write(
        temp.path().join("sift.json"),
        r#"{"priority_overrides": [{"pattern": "tests/**", "priority": 2}]}"#,
    )
    .unwrap();
    let body = run_json(
        temp.path(),
        &["--config", "sift.json", "prioritize", "signals.json"],
    );
    assert_eq!(body[1]["priority"], 2);
}

#[cfg(unix)]
#[test]
fn command_provider_answers_are_applied() {
    let temp = setup();
    fs::write(
        temp.path().join("llm.sh"),
        "cat > /dev/null\necho '{\"priorities\": [{\"id\": \"sig-2\", \"priority\": 4, \"reasoning\": \"cosmetic\"}]}'\n",
    )
    .unwrap();

    let output = sift()
        .current_dir(temp.path())
        .args(["--provider", "command", "--llm-command", "sh llm.sh"])
        .args(["--format", "json", "prioritize", "signals.json"])
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body[2]["priority"], 4);
    assert!(body[0].get("priority").is_none());
}
