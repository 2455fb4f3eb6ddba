//! Shared utilities for integration tests.

use assert_cmd::Command;
use std::path::Path;

/// Build a `minivault` command rooted at `dir` as its data directory.
pub fn cmd(dir: &Path) -> Command {
    let mut command = Command::cargo_bin("minivault").unwrap();
    command.arg("--data-dir").arg(dir);
    command
}

/// Initialize a stash at `dir` with `password`, confirming it once.
pub fn init(dir: &Path, password: &str) {
    cmd(dir)
        .arg("init")
        .write_stdin(format!("{password}\n{password}\n"))
        .assert()
        .success();
}

/// Stop the daemon at `dir`, if one is running. Safe to call even if it already is not.
pub fn stop(dir: &Path) {
    let _ = cmd(dir).arg("stop").assert();
}
