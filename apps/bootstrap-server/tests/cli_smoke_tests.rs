#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the bootstrap-server binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn run_bootstrap_server(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bootstrap-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute bootstrap-server")
}

fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.path().join("config.yaml");
    fs::write(&path, yaml).expect("Failed to write config");
    path
}

#[test]
fn test_cli_help_command() {
    let output = run_bootstrap_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    for subcommand in ["run", "init", "check"] {
        assert!(stdout.contains(subcommand), "Should list '{subcommand}'");
    }
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--print-config"));
}

#[test]
fn test_cli_version_command() {
    let output = run_bootstrap_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bootstrap-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_bootstrap_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report an error: {stderr}");
}

#[test]
fn test_cli_config_missing_file() {
    let output = run_bootstrap_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_check_accepts_valid_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "
logging:
  level: warn
modules:
  storage:
    config:
      public:
        indexes: [foo, bar]
      private:
        indexes: [internal]
",
    );

    let output = run_bootstrap_server(&["--config", path.to_str().unwrap(), "check"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
}

#[test]
fn test_cli_check_rejects_malformed_module_section() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "
modules:
  storage:
    config:
      publik: {}
",
    );

    let output = run_bootstrap_server(&["--config", path.to_str().unwrap(), "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("storage"), "Should name the module: {stderr}");
}

#[test]
fn test_cli_print_config_is_yaml_readable() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "
modules:
  security:
    config:
      internal_index: sec
",
    );

    let output = run_bootstrap_server(&["--config", path.to_str().unwrap(), "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_saphyr::from_str(&stdout).unwrap();
    assert_eq!(parsed["modules"]["security"]["config"]["internal_index"], "sec");
}

#[test]
fn test_cli_init_succeeds_with_defaults() {
    let output = run_bootstrap_server(&["init"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("storage engine initialized"));
}

#[test]
fn test_cli_init_fails_on_colliding_indexes() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "
modules:
  storage:
    config:
      public:
        indexes: [foo, bar, ohnoes]
      private:
        indexes: [baz, ohnoes, qux]
",
    );

    let output = run_bootstrap_server(&["--config", path.to_str().unwrap(), "init"]);

    assert!(!output.status.success(), "Colliding scopes must abort startup");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ohnoes"), "Should name the collision: {stderr}");
    assert!(stderr.contains("services.storage.index_already_exists"));
}

#[test]
fn test_cli_init_creates_configured_first_admin() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "
logging:
  level: info
  format: text
modules:
  security:
    config:
      first_admin:
        id: root
        password: changeme
        reset: true
",
    );

    let output = run_bootstrap_server(&["--config", path.to_str().unwrap(), "init"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("first admin created from configuration"));
    assert!(stderr.contains("built-in security model restored"));
    assert!(!stderr.contains("changeme"), "Password must never be logged");
}

#[test]
fn test_cli_check_accepts_shipped_sample_config() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/bootstrap.yaml");

    let output = run_bootstrap_server(&["--config", path, "check"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}
