//! OS clipboard integration via external utilities.
//!
//! Two operations only — copy and read — invoked through `pbcopy`/`pbpaste`
//! on macOS and `xclip` elsewhere. No clipboard crate is used: the external
//! process model matches what the daemon can reach without a display-server
//! client library linked into the binary.

use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Write `value` to the system clipboard.
pub fn copy(value: &str) -> Result<()> {
    if cfg!(target_os = "macos") {
        run_with_stdin("pbcopy", &[], value)
    } else {
        run_with_stdin("xclip", &["-selection", "clipboard"], value)
    }
}

/// Unconditionally clear the system clipboard.
pub fn clear() -> Result<()> {
    copy("")
}

/// Read the current contents of the system clipboard.
pub fn read() -> Result<String> {
    let output = if cfg!(target_os = "macos") {
        Command::new("pbpaste").output()
    } else {
        Command::new("xclip")
            .args(["-selection", "clipboard", "-o"])
            .output()
    }
    .context("failed to invoke clipboard utility")?;

    if !output.status.success() {
        return Err(anyhow!(
            "clipboard read failed: {}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Clear the clipboard, but only if it still holds `expected` — used by the
/// clipboard auto-clear timer so a value the user copied elsewhere in the
/// meantime is not stomped on.
pub fn clear_if_unchanged(expected: &str) -> Result<()> {
    let current = read().unwrap_or_default();
    if current == expected {
        copy("")?;
    }
    Ok(())
}

fn run_with_stdin(program: &str, args: &[&str], input: &str) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn {program}"))?;

    child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("failed to open stdin for {program}"))?
        .write_all(input.as_bytes())?;

    let status = child.wait().with_context(|| format!("{program} did not exit cleanly"))?;
    if !status.success() {
        return Err(anyhow!("{program} exited with {status}"));
    }
    Ok(())
}
