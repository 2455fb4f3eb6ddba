//! `minivault stop` — stop the daemon if one is running. Idempotent.

use crate::config::Config;
use crate::daemon::process;
use crate::output::Output;
use anyhow::Result;

pub fn run(config: &Config, out: &Output) -> Result<()> {
    process::stop_daemon(config)?;
    out.success("daemon stopped");
    Ok(())
}
