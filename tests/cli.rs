//! CLI integration tests for the `anylist` binary
//!
//! These run the real executable with an isolated HOME, so nothing touches
//! the developer's stored credentials. Only paths that fail or finish before
//! any network traffic are covered here; command behaviour against a service
//! is tested in `src/commands.rs`.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the anylist binary, isolated in `home`
fn anylist(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("anylist"));
    cmd.env("HOME", home)
        .env_remove("ANYLIST_EMAIL")
        .env_remove("ANYLIST_PASSWORD")
        .env_remove("RUST_LOG")
        .env("ANYLIST_API_URL", "http://127.0.0.1:9")
        .env("NO_PROXY", "127.0.0.1")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy");
    cmd
}

fn write_config(home: &Path, body: &str) {
    let dir = home.join(".anylist");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.json"), body).unwrap();
}

// =============================================================================
// Help / version / usage
// =============================================================================

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    anylist(home.path())
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_every_verb() {
    let home = TempDir::new().unwrap();
    let assert = anylist(home.path()).arg("--help").assert().success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for verb in [
        "auth", "logout", "whoami", "lists", "items", "add", "check", "uncheck", "remove", "clear",
        "categories",
    ] {
        assert!(out.contains(verb), "help is missing {}", verb);
    }
}

#[test]
fn test_unknown_verb_is_usage_error() {
    let home = TempDir::new().unwrap();
    anylist(home.path()).arg("frobnicate").assert().code(2);
}

#[test]
fn test_no_command_without_terminal_is_usage_error() {
    let home = TempDir::new().unwrap();
    anylist(home.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No command given"));
}

// =============================================================================
// Categories
// =============================================================================

#[test]
fn test_categories_text() {
    let home = TempDir::new().unwrap();
    anylist(home.path())
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("produce"))
        .stdout(predicate::str::contains("frozen-foods"));
}

#[test]
fn test_categories_json() {
    let home = TempDir::new().unwrap();
    let assert = anylist(home.path()).args(["categories", "--json"]).assert().success();
    let doc: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    let all = doc.as_array().unwrap();
    assert_eq!(all.len(), 17);
    assert_eq!(all[0]["name"], "produce");
}

#[test]
fn test_unknown_category_exits_with_two() {
    let home = TempDir::new().unwrap();
    anylist(home.path())
        .args(["add", "Groceries", "Gum", "--category", "candy"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown category \"candy\""));
}

// =============================================================================
// Credentials
// =============================================================================

#[test]
fn test_not_logged_in_exits_with_three() {
    let home = TempDir::new().unwrap();
    anylist(home.path())
        .args(["items", "Groceries"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_errors_are_json_in_json_mode() {
    let home = TempDir::new().unwrap();
    let assert = anylist(home.path()).args(["--json", "lists"]).assert().code(3);
    let doc: serde_json::Value = serde_json::from_slice(&assert.get_output().stderr).unwrap();
    assert_eq!(doc["success"], false);
    assert_eq!(doc["code"], 3);
}

#[test]
fn test_whoami_prefers_environment() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), r#"{"email":"file@example.com","password":"pw"}"#);
    anylist(home.path())
        .arg("whoami")
        .env("ANYLIST_EMAIL", "env@example.com")
        .env("ANYLIST_PASSWORD", "secret")
        .assert()
        .success()
        .stdout("env@example.com (from environment)\n");
}

#[test]
fn test_whoami_reads_config() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), r#"{"email":"file@example.com","password":"pw"}"#);
    let assert = anylist(home.path()).args(["whoami", "--json"]).assert().success();
    let doc: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(doc, serde_json::json!({"email": "file@example.com", "source": "config"}));
}

#[test]
fn test_corrupt_config_is_generic_failure() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "{ nope");
    anylist(home.path())
        .arg("whoami")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_logout_removes_config_and_is_idempotent() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), r#"{"email":"file@example.com","password":"pw"}"#);

    anylist(home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
    assert!(!home.path().join(".anylist/config.json").exists());

    anylist(home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to remove"));
}

#[test]
fn test_auth_without_terminal_requires_flags() {
    let home = TempDir::new().unwrap();
    anylist(home.path())
        .arg("auth")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--email is required"));
}

#[test]
fn test_auth_network_failure_writes_nothing() {
    let home = TempDir::new().unwrap();
    anylist(home.path())
        .args(["auth", "--email", "me@example.com", "--password", "secret"])
        .assert()
        .code(1);
    assert!(!home.path().join(".anylist/config.json").exists());
}
