//! Common utilities for CLI E2E tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

/// Invoke the CLI with `home` as its home directory.
pub fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "wellnest-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("WELLNEST_ENV")
        .env_remove("WELLNEST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Invoke a CLI command and expect success.
pub fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (code, stdout, stderr) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
    stdout
}

/// Invoke a CLI command and expect failure; returns stderr.
pub fn run_cli_failure(home: &Path, args: &[&str]) -> String {
    let (code, _, stderr) = run_cli(home, args);
    assert_ne!(code, 0, "CLI command unexpectedly succeeded: {args:?}");
    stderr
}

/// Every JSON document printed, in order.
pub fn json_docs(stdout: &str) -> Vec<serde_json::Value> {
    serde_json::Deserializer::from_str(stdout)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .expect("Failed to parse JSON output")
}

/// The last JSON document printed.
pub fn last_json(stdout: &str) -> serde_json::Value {
    json_docs(stdout).pop().expect("no JSON output")
}
