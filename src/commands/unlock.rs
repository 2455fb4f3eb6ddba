//! `minivault unlock` — prompt for the master password and unlock the daemon.

use crate::commands::connect;
use crate::config::Config;
use crate::output::Output;
use anyhow::Result;
use dialoguer::Password;

pub fn run(config: &Config, out: &Output) -> Result<()> {
    let password = Password::new().with_prompt("Master password").interact()?;

    let client = connect(config)?;
    let response = client.unlock(&password)?;

    if response.ok {
        out.success("stash unlocked");
        Ok(())
    } else {
        out.error(&response.error, &response.message);
        std::process::exit(1);
    }
}
