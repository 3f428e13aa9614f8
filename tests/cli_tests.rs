//! End-to-end tests for the `sitecheck` binary.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Output;
use tempfile::TempDir;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read(path).unwrap()
}

/// A command running in an empty directory so no stray config is picked up.
fn sitecheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sitecheck").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SITECHECK_CONFIG")
        .env_remove("SITECHECK_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

async fn mock_api(body: Vec<u8>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("scan", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;
    server
}

/// Run a scan against `server` off the async runtime.
async fn run_scan(server: &MockServer, dir: &TempDir, extra: &[&str]) -> Output {
    let mut cmd = sitecheck(dir);
    cmd.args(["--no-color", "-q", "scan", "example.com", "--api-url"])
        .arg(format!("{}/api/v2/", server.uri()))
        .args(extra);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    sitecheck(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sucuri SiteCheck"))
        .stdout(predicate::str::contains("scan"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    sitecheck(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_scan_without_domain_is_usage_error() {
    let dir = TempDir::new().unwrap();
    sitecheck(&dir).arg("scan").assert().code(2);
}

#[test]
fn test_init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    sitecheck(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("sitecheck.yaml"));
    assert!(dir.path().join("sitecheck.yaml").exists());

    sitecheck(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_validate_generated_config() {
    let dir = TempDir::new().unwrap();
    sitecheck(&dir).arg("init").assert().success();
    sitecheck(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_validate_rejects_bad_value() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bad.yaml"), "render:\n  line_width: 0\n").unwrap();
    sitecheck(&dir)
        .args(["validate", "bad.yaml"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("render.line_width"));
}

#[test]
fn test_validate_missing_file() {
    let dir = TempDir::new().unwrap();
    sitecheck(&dir)
        .args(["validate", "missing.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.yaml"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scan_prints_report() {
    let dir = TempDir::new().unwrap();
    let server = mock_api(fixture("clean.json")).await;

    let output = run_scan(&server, &dir, &[]).await;
    output
        .assert()
        .success()
        .stdout(predicate::str::starts_with(" @ Website Information \n"))
        .stdout(predicate::str::contains(" Firewall: Vendor Firewall\n"))
        .stdout(predicate::str::contains(" @ Links js_local \n"))
        .stdout(predicate::str::contains("Links iframes").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_prints_raw_body() {
    let dir = TempDir::new().unwrap();
    let body = fixture("infected.json");
    let server = mock_api(body.clone()).await;

    let output = run_scan(&server, &dir, &["--export"]).await;
    pretty_assertions::assert_eq!(output.stdout, body);
    output.assert().success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_to_file() {
    let dir = TempDir::new().unwrap();
    let body = fixture("clean.json");
    let server = mock_api(body.clone()).await;

    let output = run_scan(&server, &dir, &["--export", "--output", "report.json"]).await;
    output.assert().success().stdout(predicate::str::is_empty());
    assert_eq!(std::fs::read(dir.path().join("report.json")).unwrap(), body);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_response_exit_code() {
    let dir = TempDir::new().unwrap();
    let server = mock_api(fixture("truncated.json")).await;

    let output = run_scan(&server, &dir, &[]).await;
    output
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Raw response"))
        .stderr(predicate::str::contains("http://exa"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_exit_code() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = run_scan(&server, &dir, &[]).await;
    output.assert().code(4);
}
