use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use url::Url;

/// `file://` store URL for a directory.
pub fn file_store_url(path: &Path) -> String {
    Url::from_directory_path(path)
        .expect("Failed to convert path to file URL")
        .to_string()
}

/// Run the CLI against a store, with HOME isolated under the store directory.
pub fn run_cli(store: &Path, args: &[&str]) -> Output {
    let home = store.join("home");
    std::fs::create_dir_all(&home).expect("Failed to create home directory");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalog"));
    cmd.arg("--store").arg(file_store_url(store));
    cmd.args(args);
    cmd.env("HOME", &home);
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env_remove("CATALOG_STORE");
    cmd.env_remove("CATALOG_ENDPOINT");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Parse the envelope printed on stdout.
pub fn envelope(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|e| {
        panic!(
            "stdout is not an envelope ({e}): {stdout}\nstderr: {}",
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

/// Run the CLI, expect success and return the envelope.
pub fn run_cli_success(store: &Path, args: &[&str]) -> Value {
    let output = run_cli(store, args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    envelope(&output)
}

/// Run the CLI, expect failure and return the envelope.
pub fn run_cli_failure(store: &Path, args: &[&str]) -> Value {
    let output = run_cli(store, args);
    assert!(
        !output.status.success(),
        "CLI command unexpectedly succeeded: {:?}",
        args
    );
    envelope(&output)
}
