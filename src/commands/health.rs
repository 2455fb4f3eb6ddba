//! `minivault health` (alias `h`) — report whether a daemon is running and unlocked.
//!
//! Never spawns a daemon just to ask about it: a daemon that is not running
//! is reported as not running, not started up on the spot.

use crate::config::Config;
use crate::daemon::{process, DaemonClient};
use crate::output::Output;
use anyhow::Result;

pub fn run(config: &Config, out: &Output) -> Result<()> {
    if !process::is_daemon_running(config) {
        out.success_with_data(
            "daemon not running, stash locked",
            serde_json::json!({ "running": false, "unlocked": false }),
        );
        return Ok(());
    }

    let client = DaemonClient::new(config.daemon_sock_path());
    let response = client.health()?;

    if !response.ok {
        out.error(&response.error, &response.message);
        std::process::exit(1);
    }

    let unlocked = response.data.get("unlocked").and_then(|v| v.as_bool()).unwrap_or(false);
    out.success_with_data(
        if unlocked { "daemon running, stash unlocked" } else { "daemon running, stash locked" },
        serde_json::json!({ "running": true, "unlocked": unlocked }),
    );
    Ok(())
}
