//! End-to-end CLI tests for the eia-archiver binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use support::socket_guard::should_skip_socket_bound_test;
use support::{API_KEY, EiaResponder, mount_eia};

fn archiver_cmd(cwd: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("eia-archiver").unwrap();
    cmd.current_dir(cwd)
        .env_remove("API_KEY_EIA")
        .env_remove("EIA_API_BASE_URL")
        .env_remove("EIA_ARCHIVER_OUTPUT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_query_flags() {
    let temp = TempDir::new().unwrap();
    archiver_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--frequency"))
        .stdout(predicate::str::contains("--facet"))
        .stdout(predicate::str::contains("--length"));
}

#[test]
fn test_missing_api_key_fails_before_any_request() {
    let temp = TempDir::new().unwrap();
    archiver_cmd(temp.path())
        .args(["--output-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY_EIA"));

    assert!(
        !temp.path().join("out").exists(),
        "no output directory should be created without credentials"
    );
}

#[test]
fn test_api_key_loaded_from_dotenv_file() {
    if should_skip_socket_bound_test() {
        return;
    }
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = wiremock::MockServer::start().await;
        mount_eia(&server, EiaResponder::new(12)).await;
        server
    });

    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("eia_api.env"),
        format!("API_KEY_EIA={API_KEY}\nEIA_API_BASE_URL={}\n", server.uri()),
    )
    .unwrap();

    archiver_cmd(temp.path())
        .args(["--output-dir", "out", "-f", "annual", "-l", "5", "-q"])
        .assert()
        .success();

    let root = temp.path().join("out").join("eia_api");
    let runs: Vec<_> = std::fs::read_dir(&root)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(runs.len(), 1, "exactly one run directory: {runs:?}");
    let run_name = runs[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(run_name.ends_with("#001"), "unexpected run dir {run_name}");
    assert!(
        runs[0]
            .join("annual_cost-per-btu_receipts-btu_2001.json.gz")
            .exists()
    );
    assert!(
        !runs[0]
            .join("annual_cost-per-btu_receipts-btu_2001.json")
            .exists()
    );
}

#[test]
fn test_invalid_length_rejected_by_parser() {
    let temp = TempDir::new().unwrap();
    archiver_cmd(temp.path())
        .args(["--length", "9000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("9000"));
}
