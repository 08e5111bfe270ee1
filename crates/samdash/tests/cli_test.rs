//! Integration tests for the `samdash` CLI binary.
//!
//! Parsing, help, completions and local error paths run without a
//! backend; the session tests drive the binary against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `samdash` binary with env isolation.
///
/// Clears all `SAMDASH_*` env vars and points config and data
/// directories at `home` so tests never touch the user's real files.
fn samdash_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("samdash");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("SAMDASH_PROFILE")
        .env_remove("SAMDASH_URL")
        .env_remove("SAMDASH_OUTPUT")
        .env_remove("SAMDASH_INSECURE")
        .env_remove("SAMDASH_TIMEOUT")
        .env_remove("SAMDASH_PASSWORD");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": true,
        "message": "ok",
        "data": data,
    }))
}

async fn mount_account(server: &MockServer, credential: &str) {
    let user = json!({ "id": 1, "userId": "U001", "username": "ops", "credential": credential });
    Mock::given(method("POST"))
        .and(path("/api/v1/login/user"))
        .respond_with(ok(json!({ "token": "tok-1", "user": user.clone() })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/current/user"))
        .respond_with(ok(user))
        .mount(server)
        .await;
}

/// Run the blocking binary off the runtime driving the mock server.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = samdash_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("SAM")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("locations"))
            .and(predicate::str::contains("data")),
    );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("samdash"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = samdash_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_devices_list_without_config() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["devices", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_unknown_profile_is_not_found() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["--profile", "lab", "locations", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("lab"));
}

#[test]
fn test_whoami_without_session() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["--url", "http://127.0.0.1:9", "whoami"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_short_password_rejected_before_request() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["--url", "http://127.0.0.1:9", "login", "admin", "--password-stdin"])
        .write_stdin("short\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("8"));
}

#[test]
fn test_malformed_date_rejected_by_parser() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["data", "query", "SAM-001", "--from", "yesterday"])
        .assert()
        .code(2);
}

#[test]
fn test_config_show_no_config() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_set_then_use_profile() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["--profile", "lab", "config", "set", "url", "http://10.0.0.5:8080"])
        .assert()
        .success();
    samdash_cmd(home.path())
        .args(["config", "use", "lab"])
        .assert()
        .success();
    samdash_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("default_profile = \"lab\"")
                .and(predicate::str::contains("http://10.0.0.5:8080")),
        );
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["config", "set", "site", "main"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_access_subcommands_exist() {
    let home = tempfile::tempdir().unwrap();
    samdash_cmd(home.path())
        .args(["access", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("accessible"))
                .and(predicate::str::contains("grant"))
                .and(predicate::str::contains("revoke")),
        );
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_list_locations_as_json() {
    let server = MockServer::start().await;
    mount_account(&server, "operator").await;
    Mock::given(method("GET"))
        .and(path("/api/v8/location/get"))
        .respond_with(ok(json!([
            { "id": 1, "location": "Depot" },
            { "id": 2, "location": "Gate-A" },
        ])))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let mut login = samdash_cmd(home.path());
    login
        .args(["--url", &server.uri(), "login", "ops", "--password-stdin"])
        .write_stdin("hunter22\n");
    let output = run(login).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Logged in as ops"));

    let mut list = samdash_cmd(home.path());
    list.args(["--url", &server.uri(), "-o", "json", "locations", "list"]);
    let output = run(list).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Depot", "Gate-A"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_guest_cannot_manage_users() {
    let server = MockServer::start().await;
    mount_account(&server, "guest").await;
    let home = tempfile::tempdir().unwrap();

    let mut login = samdash_cmd(home.path());
    login
        .args(["--url", &server.uri(), "login", "ops", "--password-stdin"])
        .write_stdin("hunter22\n");
    assert!(run(login).await.status.success());

    let mut users = samdash_cmd(home.path());
    users.args(["--url", &server.uri(), "users", "list"]);
    let output = run(users).await;
    assert_eq!(output.status.code(), Some(5), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Permission denied"));
}
