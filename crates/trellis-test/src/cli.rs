//! CLI regression tests for the `petstore` binary.
//!
//! These tests invoke the binary as a subprocess to catch regressions in flag
//! names, exit codes and output files.
//!
//! Run with: `cargo test -p trellis-test`
//! Requires the `petstore` binary to be built first (`cargo build -p trellis-petstore`).

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns an assert_cmd Command wrapping the `petstore` binary.
fn petstore() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("petstore")
        .expect("petstore binary not found, run `cargo build -p trellis-petstore` first")
}

/// Absolute path to the shared test fixtures directory.
fn fixtures() -> PathBuf {
    // CARGO_MANIFEST_DIR = .../crates/trellis-test
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crates/")
        .parent()
        .expect("workspace root")
        .join("tests/fixtures")
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    let bytes = std::fs::read(path).expect("output file");
    serde_json::from_slice(&bytes).expect("output should be valid JSON")
}

fn read_yaml(path: &std::path::Path) -> serde_yaml::Value {
    let text = std::fs::read_to_string(path).expect("output file");
    serde_yaml::from_str(&text).expect("output should be valid YAML")
}

// ---------------------------------------------------------------------------
// petstore validate
// ---------------------------------------------------------------------------

#[test]
fn validate_builtin_config_exits_zero() {
    petstore()
        .arg("validate")
        .assert()
        .success()
        .stdout(contains("API description valid."));
}

#[test]
fn validate_with_config_file_exits_zero() {
    petstore()
        .args(["validate", "--config"])
        .arg(fixtures().join("petstore.yaml"))
        .assert()
        .success();
}

#[test]
fn validate_unparseable_config_exits_two() {
    petstore()
        .args(["validate", "--config"])
        .arg(fixtures().join("invalid-parse-error.yaml"))
        .assert()
        .failure()
        .code(2)
        .stderr(contains("E1070"));
}

#[test]
fn validate_bad_docs_path_exits_two() {
    petstore()
        .args(["validate", "--config"])
        .arg(fixtures().join("invalid-docs-path.yaml"))
        .assert()
        .failure()
        .code(2)
        .stderr(contains("docs_path must start with '/'"));
}

#[test]
fn validate_missing_config_exits_two() {
    petstore()
        .args(["validate", "--config", "this-file-does-not-exist.yaml"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("failed to read"));
}

#[test]
fn validate_disabled_description_exits_zero() {
    petstore()
        .args(["validate", "--config"])
        .arg(fixtures().join("disabled.yaml"))
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// petstore export
// ---------------------------------------------------------------------------

#[test]
fn export_json_by_extension() {
    let tmp = TempDir::new().expect("temp dir");
    let output = tmp.path().join("openapi.json");

    petstore()
        .args(["export", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("API description written to"));

    let doc = read_json(&output);
    assert_eq!(doc["openapi"], "3.1.0");
    assert_eq!(doc["info"]["title"], "Petstore");
    assert_eq!(doc["paths"]["/pets/{petId}"]["get"]["operationId"], "getPetById");
    assert!(doc["paths"].get("/internal/health").is_none());
}

#[test]
fn export_yaml_by_default() {
    let tmp = TempDir::new().expect("temp dir");
    let output = tmp.path().join("openapi.yaml");

    petstore()
        .args(["export", "-o"])
        .arg(&output)
        .assert()
        .success();

    let doc = read_yaml(&output);
    assert_eq!(doc["info"]["title"], serde_yaml::Value::from("Petstore"));
    assert!(doc["paths"]["/store/orders"]["post"].is_mapping());
}

#[test]
fn export_format_flag_overrides_extension() {
    let tmp = TempDir::new().expect("temp dir");
    let output = tmp.path().join("openapi.txt");

    petstore()
        .args(["export", "--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();

    let doc = read_json(&output);
    assert!(doc["paths"].is_object());
}

#[test]
fn export_unknown_format_exits_two() {
    let tmp = TempDir::new().expect("temp dir");

    petstore()
        .args(["export", "--format", "xml", "--output"])
        .arg(tmp.path().join("openapi.xml"))
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unknown format"));
}

#[test]
fn export_uses_config_file() {
    let tmp = TempDir::new().expect("temp dir");
    let output = tmp.path().join("openapi.json");

    petstore()
        .args(["export", "--config"])
        .arg(fixtures().join("petstore.yaml"))
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let doc = read_json(&output);
    assert_eq!(doc["openapi"], "3.0.3");
    assert_eq!(doc["info"]["version"], "2.0.0");
    assert_eq!(doc["servers"][0]["url"], "https://petstore.example.com/v2");
}

#[test]
fn export_disabled_description_exits_one() {
    let tmp = TempDir::new().expect("temp dir");
    let output = tmp.path().join("openapi.json");

    petstore()
        .args(["export", "--config"])
        .arg(fixtures().join("disabled.yaml"))
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("disabled"));

    assert!(!output.exists());
}

#[test]
fn export_to_missing_directory_exits_three() {
    let tmp = TempDir::new().expect("temp dir");

    petstore()
        .args(["export", "--output"])
        .arg(tmp.path().join("no/such/dir/openapi.json"))
        .assert()
        .failure()
        .code(3)
        .stderr(contains("failed to write"));
}

#[test]
fn export_missing_output_flag_exits_two() {
    // --output is required; clap returns exit code 2 for missing required args
    petstore().arg("export").assert().failure().code(2);
}

// ---------------------------------------------------------------------------
// petstore serve
// ---------------------------------------------------------------------------

#[test]
fn serve_unknown_log_format_exits_two() {
    petstore()
        .args(["serve", "--log-format", "xml"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("unknown log format"));
}

#[test]
fn serve_invalid_listen_address_exits_two() {
    petstore()
        .args(["serve", "--listen", "not-an-address"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn help_lists_subcommands() {
    petstore()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("validate"))
        .stdout(contains("export"))
        .stdout(contains("serve"));
}
