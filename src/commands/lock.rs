//! `minivault lock` — explicitly lock the running daemon.

use crate::clipboard;
use crate::config::Config;
use crate::daemon::{process, DaemonClient};
use crate::output::Output;
use anyhow::Result;

pub fn run(config: &Config, out: &Output) -> Result<()> {
    // Best-effort clipboard clear regardless of daemon state.
    let _ = clipboard::clear();

    if !process::is_daemon_running(config) {
        out.success("stash locked");
        return Ok(());
    }

    let client = DaemonClient::new(config.daemon_sock_path());
    let response = client.lock()?;

    if response.ok {
        out.success("stash locked");
        Ok(())
    } else {
        out.error(&response.error, &response.message);
        std::process::exit(1);
    }
}
