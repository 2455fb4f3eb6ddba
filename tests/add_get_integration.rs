//! Integration tests covering the daemon lifecycle: add, get, list, delete,
//! rename, and lock/unlock round trips through a real background daemon.
mod common;

use common::{cmd, init, stop};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn add_then_get_roundtrips_via_stdout() {
    let dir = TempDir::new().unwrap();
    init(dir.path(), "hunter2");

    cmd(dir.path())
        .arg("unlock")
        .write_stdin("hunter2\n")
        .assert()
        .success();

    cmd(dir.path())
        .arg("add")
        .arg("github-token")
        .arg("abc123")
        .assert()
        .success();

    cmd(dir.path())
        .arg("get")
        .arg("github-token")
        .arg("--stdout")
        .assert()
        .success()
        .stdout(predicate::str::contains("abc123"));

    stop(dir.path());
}

#[test]
fn list_filters_by_substring() {
    let dir = TempDir::new().unwrap();
    init(dir.path(), "hunter2");
    cmd(dir.path()).arg("unlock").write_stdin("hunter2\n").assert().success();

    cmd(dir.path()).arg("add").arg("github-token").arg("a").assert().success();
    cmd(dir.path()).arg("add").arg("gitlab-token").arg("b").assert().success();
    cmd(dir.path()).arg("add").arg("aws-key").arg("c").assert().success();

    let output = cmd(dir.path()).arg("list").arg("token").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("github-token"));
    assert!(stdout.contains("gitlab-token"));
    assert!(!stdout.contains("aws-key"));

    stop(dir.path());
}

#[test]
fn delete_removes_key() {
    let dir = TempDir::new().unwrap();
    init(dir.path(), "hunter2");
    cmd(dir.path()).arg("unlock").write_stdin("hunter2\n").assert().success();
    cmd(dir.path()).arg("add").arg("temp-key").arg("v").assert().success();

    cmd(dir.path()).arg("delete").arg("temp-key").assert().success();
    cmd(dir.path())
        .arg("get")
        .arg("temp-key")
        .arg("--stdout")
        .assert()
        .failure();

    stop(dir.path());
}

#[test]
fn rename_overwrites_existing_destination() {
    let dir = TempDir::new().unwrap();
    init(dir.path(), "hunter2");
    cmd(dir.path()).arg("unlock").write_stdin("hunter2\n").assert().success();
    cmd(dir.path()).arg("add").arg("a").arg("1").assert().success();
    cmd(dir.path()).arg("add").arg("b").arg("existing").assert().success();

    cmd(dir.path()).arg("rename").arg("a").arg("b").assert().success();

    cmd(dir.path())
        .arg("get")
        .arg("b")
        .arg("--stdout")
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
    cmd(dir.path()).arg("get").arg("a").arg("--stdout").assert().failure();

    stop(dir.path());
}

#[test]
fn lock_clears_access_until_unlocked_again() {
    let dir = TempDir::new().unwrap();
    init(dir.path(), "hunter2");
    cmd(dir.path()).arg("unlock").write_stdin("hunter2\n").assert().success();
    cmd(dir.path()).arg("add").arg("k").arg("v").assert().success();

    cmd(dir.path()).arg("lock").assert().success();

    cmd(dir.path())
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("locked"));

    // With piped (non-interactive) stdin, auto-unlock-on-locked never kicks in.
    cmd(dir.path()).arg("get").arg("k").arg("--stdout").assert().failure();

    cmd(dir.path()).arg("unlock").write_stdin("hunter2\n").assert().success();
    cmd(dir.path())
        .arg("get")
        .arg("k")
        .arg("--stdout")
        .assert()
        .success()
        .stdout(predicate::str::contains("v"));

    stop(dir.path());
}

#[test]
fn stop_is_idempotent_when_no_daemon_is_running() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path()).arg("stop").assert().success();
    cmd(dir.path()).arg("stop").assert().success();
}
