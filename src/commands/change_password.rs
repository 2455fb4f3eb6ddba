//! `minivault change-password` — re-encrypt the store under a new password.
//!
//! Refuses to run while a daemon is reachable: the daemon's cached key would
//! otherwise go stale the instant this command rewrites the envelope.

use crate::config::Config;
use crate::daemon::process;
use crate::error::StashError;
use crate::output::Output;
use crate::stash::Stash;
use anyhow::Result;
use dialoguer::Password;

pub fn run(config: &Config, out: &Output) -> Result<()> {
    if process::is_daemon_running(config) {
        let err = StashError::DaemonRunning;
        out.error(err.code(), &err.to_string());
        std::process::exit(1);
    }

    let old_password = Password::new().with_prompt("Current master password").interact()?;
    let new_password = Password::new().with_prompt("New master password").interact()?;
    let confirm = Password::new().with_prompt("Confirm new master password").interact()?;

    if new_password != confirm {
        out.error("invalid_request", "passwords do not match");
        std::process::exit(1);
    }

    let stash = Stash::new(config.stash_path());
    stash.change_password(&old_password, &new_password)?;

    out.success("master password changed");
    Ok(())
}
