//! Integration tests for `minivault init`.
mod common;

use common::{cmd, stop};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn init_creates_encrypted_store_with_owner_only_permissions() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .arg("init")
        .write_stdin("hunter2\nhunter2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("stash initialized"));

    let stash_path = dir.path().join("stash.json");
    assert!(stash_path.exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&stash_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn init_twice_fails() {
    let dir = TempDir::new().unwrap();
    cmd(dir.path()).arg("init").write_stdin("hunter2\nhunter2\n").assert().success();

    cmd(dir.path())
        .arg("init")
        .write_stdin("hunter2\nhunter2\n")
        .assert()
        .failure();

    stop(dir.path());
}

#[test]
fn init_rejects_mismatched_confirmation() {
    let dir = TempDir::new().unwrap();

    cmd(dir.path())
        .arg("init")
        .write_stdin("hunter2\nsomething-else\n")
        .assert()
        .failure();

    assert!(!dir.path().join("stash.json").exists());
}
