//! Smoke tests to verify command module wiring

use assert_cmd::Command;
use predicates::prelude::*;

// === Comments Command Tests ===

#[test]
fn test_comments_list_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("comments").arg("list").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Sort order"));
}

#[test]
fn test_comments_post_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("comments").arg("post").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("max 500 characters"));
}

#[test]
fn test_comments_block_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("comments").arg("block").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Reason recorded with the block"));
}

// === Notify Command Tests ===

#[test]
fn test_notify_bell_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("notify").arg("bell").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("polling every 30 seconds"));
}

#[test]
fn test_notify_open_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("notify").arg("open").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Notification id"));
}

// === Mod Command Tests ===

#[test]
fn test_mod_overview_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("mod").arg("overview").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Triage status filter"));
}

#[test]
fn test_mod_delete_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("mod").arg("delete").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("admin endpoint"));
}

#[test]
fn test_mod_pin_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("mod").arg("pin").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pinned flag"));
}

#[test]
fn test_mod_read_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("mod").arg("read").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Comment id to mark triaged"));
}

// === Auth Command Tests ===

#[test]
fn test_auth_login_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("auth").arg("login").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("JWT bearer token"));
}

#[test]
fn test_auth_whoami_help() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("auth").arg("whoami").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("current session identity"));
}

// === Completions ===

#[test]
fn test_completions_bash() {
    let mut cmd = Command::cargo_bin("arcadectl").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("arcadectl"));
}
