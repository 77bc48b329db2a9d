//! Integration tests for the `selectra` CLI binary.
//!
//! These tests validate argument parsing, command output and error
//! handling against option lists written to a temp directory.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `selectra` binary with env isolation.
///
/// Points the config file at a path inside `dir` so tests never touch
/// the user's real configuration.
fn selectra_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("selectra");
    cmd.env("SELECTRA_CONFIG", dir.join("config.toml"))
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("NO_COLOR", "1")
        .env_remove("SELECTRA_SELECT__DEBOUNCE_MS")
        .env_remove("SELECTRA_DEFAULTS__OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn letters(dir: &Path) -> PathBuf {
    write(
        dir,
        "letters.json",
        r#"[{"value": 1, "label": "A"}, {"value": 2, "label": "B"}]"#,
    )
}

fn fruit(dir: &Path) -> PathBuf {
    write(
        dir,
        "fruit.json",
        r#"[
            {"value": "apple", "label": "Apple"},
            {"label": "Berries", "options": [
                {"value": "blueberry", "label": "Blueberry"},
                {"value": "strawberry", "label": "Strawberry", "disabled": true}
            ]},
            {"value": "pineapple", "label": "Pineapple", "secondary_label": "tropical"}
        ]"#,
    )
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    let output = selectra_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    selectra_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("resolve")
            .and(predicate::str::contains("search"))
            .and(predicate::str::contains("replay"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    selectra_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── resolve ─────────────────────────────────────────────────────────

#[test]
fn test_resolve_single_value_json() {
    let dir = TempDir::new().unwrap();
    let list = letters(dir.path());
    selectra_cmd(dir.path())
        .args(["resolve", "-o", "json", "--value", "2", "--list"])
        .arg(&list)
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""label": "B""#)
                .and(predicate::str::contains(r#""input_value": "B""#))
                .and(predicate::str::contains(r#""orphans": []"#)),
        );
}

#[test]
fn test_resolve_flags_orphans() {
    let dir = TempDir::new().unwrap();
    let list = letters(dir.path());
    selectra_cmd(dir.path())
        .args(["resolve", "-o", "json-compact", "--multi", "--value", "[1, 99]", "--list"])
        .arg(&list)
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""is_orphan_value":true"#)
                .and(predicate::str::contains(r#""orphans":[99]"#)),
        )
        .stderr(predicate::str::contains("orphan"));
}

#[test]
fn test_resolve_table_output() {
    let dir = TempDir::new().unwrap();
    let list = letters(dir.path());
    selectra_cmd(dir.path())
        .args(["resolve", "--value", "1", "--list"])
        .arg(&list)
        .assert()
        .success()
        .stdout(predicate::str::contains("Label").and(predicate::str::contains("A")));
}

#[test]
fn test_resolve_rejects_invalid_value() {
    let dir = TempDir::new().unwrap();
    let list = letters(dir.path());
    selectra_cmd(dir.path())
        .args(["resolve", "--value", "{oops", "--list"])
        .arg(&list)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid value for value"));
}

#[test]
fn test_missing_list_file_exits_with_input_code() {
    let dir = TempDir::new().unwrap();
    selectra_cmd(dir.path())
        .args(["resolve", "--value", "1", "--list"])
        .arg(dir.path().join("nope.json"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Could not read"));
}

#[test]
fn test_malformed_list_exits_with_input_code() {
    let dir = TempDir::new().unwrap();
    let list = write(dir.path(), "bad.json", "[{\"label\": ");
    selectra_cmd(dir.path())
        .args(["search", "--query", "a", "--list"])
        .arg(&list)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Invalid JSON"));
}

// ── search ──────────────────────────────────────────────────────────

#[test]
fn test_search_matches_grouped_labels_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let list = fruit(dir.path());
    selectra_cmd(dir.path())
        .args(["search", "-o", "plain", "--query", "APPLE", "--list"])
        .arg(&list)
        .assert()
        .success()
        .stdout("apple\tApple\npineapple\tPineapple\n");
}

#[test]
fn test_search_matches_secondary_label() {
    let dir = TempDir::new().unwrap();
    let list = fruit(dir.path());
    selectra_cmd(dir.path())
        .args(["search", "-o", "plain", "--query", "trop", "--list"])
        .arg(&list)
        .assert()
        .success()
        .stdout("pineapple\tPineapple\n");
}

#[test]
fn test_search_reads_list_from_stdin() {
    let dir = TempDir::new().unwrap();
    selectra_cmd(dir.path())
        .args(["search", "-o", "plain", "--query", "b", "--list", "-"])
        .write_stdin(r#"[{"value": 1, "label": "A"}, {"value": 2, "label": "B"}]"#)
        .assert()
        .success()
        .stdout("2\tB\n");
}

// ── replay ──────────────────────────────────────────────────────────

#[test]
fn test_replay_reports_changes_per_step() {
    let dir = TempDir::new().unwrap();
    let list = fruit(dir.path());
    let script = write(
        dir.path(),
        "script.json",
        r#"[
            {"type": "open"},
            {"type": "on_change", "option": {"value": "apple", "label": "Apple"}},
            {"type": "on_change", "option": {"value": "blueberry", "label": "Blueberry"}},
            {"type": "input_keydown", "key": "backspace"}
        ]"#,
    );
    selectra_cmd(dir.path())
        .args(["replay", "-o", "plain", "--multi", "--name", "fruit", "--list"])
        .arg(&list)
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(
            "1\tOPEN\t\n\
             2\tON_CHANGE\t[\"apple\"]\n\
             3\tON_CHANGE\t[\"apple\",\"blueberry\"]\n\
             4\tINPUT_KEYDOWN\t[\"apple\"]\n",
        );
}

#[test]
fn test_replay_creatable_json() {
    let dir = TempDir::new().unwrap();
    let list = fruit(dir.path());
    let script = write(
        dir.path(),
        "script.json",
        r#"[
            {"type": "input_text_change", "text": "Mango"},
            {"type": "input_keydown", "key": "enter"}
        ]"#,
    );
    selectra_cmd(dir.path())
        .args(["replay", "-o", "json-compact", "--creatable", "--list"])
        .arg(&list)
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""created":true"#)
                .and(predicate::str::contains(r#""value":"Mango""#)),
        );
}

#[test]
fn test_replay_rejects_unknown_action() {
    let dir = TempDir::new().unwrap();
    let list = letters(dir.path());
    let script = write(dir.path(), "script.json", r#"[{"type": "explode"}]"#);
    selectra_cmd(dir.path())
        .args(["replay", "--list"])
        .arg(&list)
        .arg("--script")
        .arg(&script)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("action script"));
}

// ── config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_override() {
    let dir = TempDir::new().unwrap();
    selectra_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    selectra_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").exists());

    selectra_cmd(dir.path())
        .args(["config", "init"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));

    selectra_cmd(dir.path())
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""debounce_ms": 300"#));
}

#[test]
fn test_config_output_default_is_used() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "config.toml", "[defaults]\noutput = \"plain\"\n");
    let list = letters(dir.path());
    selectra_cmd(dir.path())
        .args(["resolve", "--value", "2", "--list"])
        .arg(&list)
        .assert()
        .success()
        .stdout("2\tB\n");
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "config.toml", "[select]\nmax_logged_query_len = 0\n");
    let list = letters(dir.path());
    selectra_cmd(dir.path())
        .args(["resolve", "--value", "2", "--list"])
        .arg(&list)
        .assert()
        .code(3);
}
