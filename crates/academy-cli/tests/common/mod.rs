use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::{Value, json};
use wiremock::MockServer;

/// API base for a mock server.
pub fn api_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}/api", server.address().port())
}

/// Where the CLI keeps its credential under an isolated HOME.
pub fn credential_file(home: &Path) -> PathBuf {
    home.join("data").join("academy").join("session.json")
}

fn command(args: &[&str], home: &Path, api: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_academy"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("ACADEMY_API_URL", api);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("ACADEMY_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Run the CLI with a custom HOME directory for isolated credential storage.
pub fn run_cli(args: &[&str], home: &Path, api: &str) -> Output {
    command(args, home, api)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI")
}

/// Run the CLI feeding `input` on stdin.
pub fn run_cli_with_input(args: &[&str], home: &Path, api: &str, input: &str) -> Output {
    let mut child = command(args, home, api)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().expect("Failed to wait for CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(args: &[&str], home: &Path, api: &str) -> String {
    let output = run_cli(args, home, api);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_failure(args: &[&str], home: &Path, api: &str) -> String {
    let output = run_cli(args, home, api);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

pub fn user(role: &str) -> Value {
    json!({
        "id": 5,
        "name": "Ana Ruiz",
        "email": "ana@academy.test",
        "role": role,
        "documentNumber": "1002003",
        "phoneNumber": "3000000000"
    })
}
