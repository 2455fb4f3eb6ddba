//! `minivault delete` — remove a secret.

use crate::commands::connect;
use crate::config::Config;
use crate::output::Output;
use anyhow::Result;

pub fn run(config: &Config, out: &Output, key: &str) -> Result<()> {
    let client = connect(config)?;
    let response = client.delete(key)?;

    if response.ok {
        out.success(&format!("deleted \"{key}\""));
        Ok(())
    } else {
        out.error(&response.error, &response.message);
        std::process::exit(1);
    }
}
