//! CLI integration tests for unitodo
//!
//! Every test points `UNITODO_CONFIG` at a temporary file so the user's
//! own configuration never leaks in.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the unitodo binary, isolated from user config
fn unitodo_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("unitodo"));
    cmd.env("UNITODO_CONFIG", dir.path().join("config.toml"));
    cmd
}

fn write_config(dir: &TempDir, content: &str) {
    fs::write(dir.path().join("config.toml"), content).unwrap();
}

const SCAN: &str = r#"{"categories":[
  {"name":"api","icon":"","todos":[
    {"content":"1@AAAAB write docs","location":"api/lib.rs:3","status":"TODO"},
    {"content":"zeta cleanup","location":"api/parse.rs:9","status":"DOING"},
    {"content":"@AAAAC@@AAAAD audit","location":"api/lib.rs:7","status":"DONE"}
  ]},
  {"name":"notes","icon":"","todos":[
    {"content":"Archive notes","location":"notes.md:1","status":"- [ ]"}
  ]}
]}"#;

// =============================================================================
// Parse Tests
// =============================================================================

#[test]
fn test_parse_text_output() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["parse", "  1@AAAAB ship it"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ship it"))
        .stdout(predicate::str::contains("@AAAAB"))
        .stdout(predicate::str::contains("2025-01-01T00:00:01Z"));
}

#[test]
fn test_parse_json_output() {
    let dir = TempDir::new().unwrap();

    let output = unitodo_cmd(&dir)
        .args(["--format", "json", "parse", "A##12@@AAAAC fix bug"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["priority"], "A");
    assert_eq!(json["id_part"], "##12");
    assert_eq!(json["done_part"], "@@AAAAC");
    assert_eq!(json["main_content"], "fix bug");
    assert_eq!(json["is_unique"], false);
    assert_eq!(json["is_valid_format"], true);
}

#[test]
fn test_parse_opaque_line() {
    let dir = TempDir::new().unwrap();

    let output = unitodo_cmd(&dir)
        .args(["-f", "json", "parse", "just some words"])
        .output()
        .unwrap();

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["main_content"], "just some words");
    assert_eq!(json["is_valid_format"], false);
    assert!(json["priority"].is_null());
}

// =============================================================================
// Timestamp Tests
// =============================================================================

#[test]
fn test_encode_at_epoch() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["encode", "--at", "2025-01-01T00:01:04Z"])
        .assert()
        .success()
        .stdout("AAABA\n");
}

#[test]
fn test_encode_before_epoch_clamps() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["encode", "--at", "2020-06-01T12:00:00Z"])
        .assert()
        .success()
        .stdout("AAAAA\n");
}

#[test]
fn test_decode_accepts_prefixes() {
    let dir = TempDir::new().unwrap();

    for token in ["AAABA", "@AAABA", "@@AAABA"] {
        unitodo_cmd(&dir)
            .args(["decode", token])
            .assert()
            .success()
            .stdout("2025-01-01T00:01:04Z\n");
    }
}

#[test]
fn test_decode_rejects_bad_token() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["decode", "AB*DE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timestamp token"));
}

#[test]
fn test_new_builds_head() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["new", "write tests", "--priority", "2", "--at", "2025-01-01T00:00:03Z"])
        .assert()
        .success()
        .stdout("TODO 2@AAAAD write tests\n");
}

#[test]
fn test_new_reports_open_marker() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[profiles.default]\ntodo_states = [[\"- [ ]\", \"- [/]\", \"- [x]\"]]\n");

    let output = unitodo_cmd(&dir)
        .args(["-f", "json", "new", "tidy up", "--at", "2025-01-01T00:00:00Z"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["marker"], "- [ ]");
    assert_eq!(json["content"], "1@AAAAA tidy up");
    assert_eq!(json["line"], "- [ ] 1@AAAAA tidy up");
}

#[test]
fn test_new_without_states_has_no_marker() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[profiles.default]\ntodo_states = []\n");

    unitodo_cmd(&dir)
        .args(["new", "tidy up", "--at", "2025-01-01T00:00:00Z"])
        .assert()
        .success()
        .stdout("1@AAAAA tidy up\n");
}

#[test]
fn test_new_rejects_bad_priority() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["new", "x", "--priority", "p-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid priority"));
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_rank_with_default_profile() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["rank", "DOING"])
        .assert()
        .success()
        .stdout(predicate::str::contains("doing (1)"));

    unitodo_cmd(&dir)
        .args(["rank", "- [x]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("done_like (4)"));

    unitodo_cmd(&dir)
        .args(["rank", "FIXME"])
        .assert()
        .success()
        .stdout(predicate::str::contains("other_active (3)"));
}

#[test]
fn test_rank_unconfigured_is_unknown() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, "[profiles.default]\ntodo_states = []\n");

    unitodo_cmd(&dir)
        .args(["-f", "json", "rank", "TODO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rank\":\"unknown\""));
}

#[test]
fn test_cycle_wraps() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["cycle", "CANCELLED"])
        .assert()
        .success()
        .stdout("TODO\n");

    unitodo_cmd(&dir)
        .args(["cycle", "--backward", "- [ ]"])
        .assert()
        .success()
        .stdout("- [-]\n");
}

#[test]
fn test_cycle_unknown_marker_fails() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir).args(["cycle", "WAIT"]).assert().failure();
}

#[test]
fn test_transition_stamps_and_strips() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args([
            "transition",
            "1@AAAAB ship it",
            "--from",
            "TODO",
            "--to",
            "DONE",
            "--at",
            "2025-01-01T00:00:02Z",
        ])
        .assert()
        .success()
        .stdout("1@AAAAB@@AAAAC ship it\n");

    unitodo_cmd(&dir)
        .args(["transition", "1@AAAAB@@AAAAC ship it", "--from", "DONE", "--to", "TODO"])
        .assert()
        .success()
        .stdout("1@AAAAB ship it\n");
}

#[test]
fn test_mark_done_switches_to_paired_marker() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["mark-done", "1@AAAAB ship it", "--from", "TODO", "--at", "2025-01-01T00:00:02Z"])
        .assert()
        .success()
        .stdout("DONE 1@AAAAB@@AAAAC ship it\n");

    let output = unitodo_cmd(&dir)
        .args(["-f", "json", "mark-done", "notes", "--from", "- [ ]"])
        .args(["--at", "2025-01-01T00:00:02Z"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "- [x]");
    assert_eq!(json["content"], "notes@@AAAAC");
}

#[test]
fn test_mark_done_needs_open_marker() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["mark-done", "1@AAAAB ship it", "--from", "DOING"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No done marker"));
}

// =============================================================================
// Sort Tests
// =============================================================================

#[test]
fn test_sort_active_from_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("scan.json");
    fs::write(&file, SCAN).unwrap();

    let output = unitodo_cmd(&dir)
        .args(["-f", "json", "sort", "--filter", "active"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    let contents: Vec<&str> = rows.iter().map(|r| r["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["zeta cleanup", "Archive notes", "1@AAAAB write docs"]);
    assert_eq!(rows[0]["rank"], "doing");
    assert_eq!(rows[1]["category"], "notes");

    assert_eq!(rows[0]["path"], "api/parse.rs");
    assert_eq!(rows[0]["line"], 9);
    assert_eq!(rows[0]["file"], "parse.rs");
}

#[test]
fn test_sort_from_stdin_with_query() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["sort", "--query", "AUDIT"])
        .write_stdin(SCAN)
        .assert()
        .success()
        .stdout("DONE\t@AAAAC@@AAAAD audit\tapi/lib.rs:7\n");
}

#[test]
fn test_sort_uses_profile_default_filter() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"
[profiles.default]
todo_states = [["TODO", "DOING", "DONE", "CANCELLED"]]
default_filter = "closed"
"#,
    );

    unitodo_cmd(&dir)
        .arg("sort")
        .write_stdin(SCAN)
        .assert()
        .success()
        .stdout(predicate::str::contains("audit"))
        .stdout(predicate::str::contains("write docs").not());
}

#[test]
fn test_sort_empty_result() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["sort", "--query", "nothing-here"])
        .write_stdin(SCAN)
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching todos"));
}

#[test]
fn test_sort_rejects_malformed_input() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .arg("sort")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse scanner output"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_init_and_show() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote config"));
    assert!(dir.path().join("config.toml").is_file());

    unitodo_cmd(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    unitodo_cmd(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TODO | DOING | DONE | CANCELLED"));
}

#[test]
fn test_config_use_switches_profile() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"
[profiles.default]

[profiles.md]
todo_states = [["- [ ]", "- [/]", "- [x]", "- [-]"]]
"#,
    );

    unitodo_cmd(&dir)
        .args(["config", "use", "md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active profile: md"));

    // TODO is no longer a configured marker
    unitodo_cmd(&dir)
        .args(["rank", "TODO"])
        .assert()
        .success()
        .stdout(predicate::str::contains("other_active"));

    unitodo_cmd(&dir)
        .args(["config", "use", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = TempDir::new().unwrap();

    unitodo_cmd(&dir)
        .args(["--verbose", "rank", "TODO"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:config]"));
}
