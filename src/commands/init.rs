//! `minivault init` — create a new, empty encrypted store.

use crate::config::Config;
use crate::output::Output;
use crate::stash::Stash;
use anyhow::Result;
use dialoguer::Password;

pub fn run(config: &Config, out: &Output) -> Result<()> {
    if config.stash_path().exists() {
        out.error("already_initialized", "stash is already initialized");
        std::process::exit(1);
    }

    let password = Password::new()
        .with_prompt("Set master password")
        .interact()?;

    if password.is_empty() {
        out.error("empty_password", "password must not be empty");
        std::process::exit(1);
    }

    let confirm = Password::new().with_prompt("Confirm master password").interact()?;
    if password != confirm {
        out.error("invalid_request", "passwords do not match");
        std::process::exit(1);
    }

    let stash = Stash::new(config.stash_path());
    stash.init(&password)?;

    out.success(&format!("stash initialized at {}", config.stash_path().display()));
    Ok(())
}
