//! Integration tests for the `huego` CLI binary.
//!
//! Argument parsing, completions and configuration run without a bridge;
//! request commands run against a `wiremock` server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const NO_CONFIG: &str = "/tmp/huego-cli-test-nonexistent/config.toml";

/// Build a command for the `huego` binary with env isolation.
fn huego_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("huego");
    cmd.env("HOME", "/tmp/huego-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/huego-cli-test-nonexistent")
        .env("HUE_CONFIG", NO_CONFIG)
        .env_remove("HUE_PROFILE")
        .env_remove("HUE_BRIDGE")
        .env_remove("HUE_APP_KEY")
        .env_remove("HUE_OUTPUT")
        .env_remove("HUE_INSECURE")
        .env_remove("HUE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || huego_cmd().args(&args).output().unwrap())
        .await
        .unwrap()
}

fn bridge_args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut args = vec![
        "--bridge".to_owned(),
        server.uri(),
        "--app-key".to_owned(),
        "test-key".to_owned(),
    ];
    args.extend(rest.iter().map(|s| (*s).to_owned()));
    args
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = huego_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    huego_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Hue")
            .and(predicate::str::contains("lights"))
            .and(predicate::str::contains("resource"))
            .and(predicate::str::contains("raw")),
    );
}

#[test]
fn test_version_flag() {
    huego_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("huego"));
}

#[test]
fn test_completions_bash() {
    huego_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_output_format() {
    huego_cmd()
        .args(["-o", "xml", "lights", "list"])
        .assert()
        .code(2);
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_missing_bridge_is_usage_error() {
    let output = huego_cmd().args(["lights", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("No bridge configured"));
}

#[test]
fn test_missing_key_is_auth_error() {
    huego_cmd()
        .args(["--bridge", "127.0.0.1:9", "lights", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No application key"));
}

#[test]
fn test_unknown_profile() {
    huego_cmd()
        .args(["--profile", "cabin", "lights", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cabin"));
}

#[test]
fn test_config_show_masks_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_profile = "home"

[profiles.home]
bridge = "192.168.1.20"
app_key = "very-secret-key"
"#,
    )
    .unwrap();

    huego_cmd()
        .env("HUE_CONFIG", &path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.home]")
                .and(predicate::str::contains("192.168.1.20"))
                .and(predicate::str::contains("very-secret-key").not()),
        );
}

#[test]
fn test_config_path_honours_override() {
    huego_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(NO_CONFIG));
}

// ── Bridge requests ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_lights_list_plain_prints_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clip/v2/resource/light"))
        .and(header("hue-application-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "data": [
                { "id": "light-1", "type": "light", "metadata": { "name": "Desk" } },
                { "id": "light-2", "type": "light", "metadata": { "name": "Hall" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(bridge_args(&server, &["-o", "plain", "lights", "list"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "light-1\nlight-2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lights_get_missing_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clip/v2/resource/light/nope"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "errors": [], "data": [] })),
        )
        .mount(&server)
        .await;

    let output = run(bridge_args(&server, &["lights", "get", "nope"])).await;
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("lights list"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_key_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clip/v2/resource/light"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{ "description": "unauthorized user" }],
            "data": []
        })))
        .mount(&server)
        .await;

    let output = run(bridge_args(&server, &["lights", "list"])).await;
    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resource_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clip/v2/resource/room"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "data": [{ "id": "room-1", "type": "room", "metadata": { "name": "Kitchen" } }]
        })))
        .mount(&server)
        .await;

    let output = run(bridge_args(&server, &["-o", "json-compact", "resource", "room"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["metadata"]["name"], "Kitchen");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_resource_type_is_rejected() {
    let server = MockServer::start().await;
    let output = run(bridge_args(&server, &["resource", "toaster"])).await;
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_raw_put_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/clip/v2/resource/light/light-1"))
        .and(header("hue-application-key", "test-key"))
        .and(wiremock::matchers::body_json(json!({ "on": { "on": true } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [],
            "data": [{ "rid": "light-1", "rtype": "light" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = run(bridge_args(
        &server,
        &[
            "-o",
            "json-compact",
            "raw",
            "/clip/v2/resource/light/light-1",
            "-X",
            "put",
            "-d",
            r#"{"on":{"on":true}}"#,
        ],
    ))
    .await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("light-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_query_never_reaches_bridge() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = run(bridge_args(
        &server,
        &["raw", "/clip/v2/resource/light", "--query", "a=%zz"],
    ))
    .await;
    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
}
