//! Integration tests for the `heathub` CLI binary.
//!
//! Argument parsing, completions and error handling run without a hub;
//! the remaining tests point the binary at a wiremock hub.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `heathub` binary with env isolation.
///
/// Clears all `HEATHUB_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn heathub_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("heathub");
    cmd.env("HOME", "/tmp/heathub-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/heathub-cli-test-nonexistent")
        .env_remove("HEATHUB_PROFILE")
        .env_remove("HEATHUB_ADDRESS")
        .env_remove("HEATHUB_SECRET")
        .env_remove("HEATHUB_OUTPUT")
        .env_remove("HEATHUB_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn sample_domain() -> serde_json::Value {
    json!({
        "System": { "EcoModeEnabled": true, "ActiveSystemVersion": "2.1.0" },
        "Room": [
            { "id": 7, "Name": "Lounge", "Mode": "Auto", "CalculatedTemperature": 205, "CurrentSetPoint": 210 },
            { "id": 8, "Name": "Kitchen", "Mode": "Manual", "CalculatedTemperature": 190, "CurrentSetPoint": 180 }
        ],
        "Device": [
            { "id": 0, "ProductType": "Controller" }
        ]
    })
}

async fn mock_hub() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domain"))
        .and(header("SECRET", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_domain()))
        .mount(&server)
        .await;
    server
}

/// Run the binary against `server` off the async runtime.
async fn run_against(server: &MockServer, args: &[&str]) -> std::process::Output {
    let mut cmd = heathub_cmd();
    cmd.args(["--address", &server.uri(), "--secret", "s3cret", "--color", "never"])
        .args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = heathub_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    heathub_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Heat Hub")
            .and(predicate::str::contains("rooms"))
            .and(predicate::str::contains("plugs"))
            .and(predicate::str::contains("hot-water")),
    );
}

#[test]
fn test_completions_zsh() {
    heathub_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_rooms_list_without_hub_config() {
    heathub_cmd()
        .args(["rooms", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No hub configured"));
}

#[test]
fn test_address_without_secret() {
    heathub_cmd()
        .args(["--address", "192.0.2.1", "rooms", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No shared secret"));
}

// ── Against a hub ───────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rooms_list_plain() {
    let server = mock_hub().await;

    let output = run_against(&server, &["rooms", "list", "-o", "plain"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Lounge\nKitchen\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rooms_get_json() {
    let server = mock_hub().await;

    let output = run_against(&server, &["rooms", "get", "kitchen", "-o", "json"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let room: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(room["id"], 8);
    assert_eq!(room["Name"], "Kitchen");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_room_exits_not_found() {
    let server = mock_hub().await;

    let output = run_against(&server, &["rooms", "set-point", "Attic", "20"]).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("room 'Attic' not found"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_set_point_sends_override() {
    let server = mock_hub().await;
    Mock::given(method("PATCH"))
        .and(path("/rooms/7"))
        .and(body_json(json!({
            "RequestOverride": { "Type": "Manual", "SetPoint": 215 }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let output = run_against(&server, &["rooms", "set-point", "lounge", "21.5"]).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("set to 21.5°C"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_rejected_command_fails() {
    let server = mock_hub().await;
    Mock::given(method("PATCH"))
        .and(path("/system"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = run_against(&server, &["system", "eco", "off"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("HTTP 500"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_invalid_secret_exits_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domain"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let output = run_against(&server, &["status"]).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Invalid authorization token"));
}
