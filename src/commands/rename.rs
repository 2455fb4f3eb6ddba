//! `minivault rename` — move a secret's value to a new key name.

use crate::commands::connect;
use crate::config::Config;
use crate::output::Output;
use anyhow::Result;

pub fn run(config: &Config, out: &Output, key: &str, new_key: &str) -> Result<()> {
    let client = connect(config)?;
    let response = client.rename(key, new_key)?;

    if response.ok {
        out.success(&format!("renamed \"{key}\" to \"{new_key}\""));
        Ok(())
    } else {
        out.error(&response.error, &response.message);
        std::process::exit(1);
    }
}
