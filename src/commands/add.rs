//! `minivault add` — store (or overwrite) a secret.

use crate::commands::connect;
use crate::config::Config;
use crate::output::Output;
use anyhow::Result;
use dialoguer::Password;

pub fn run(config: &Config, out: &Output, key: &str, value: Option<&str>) -> Result<()> {
    let value = match value {
        Some(v) => v.to_string(),
        None => Password::new().with_prompt(format!("Value for \"{key}\"")).interact()?,
    };

    let client = connect(config)?;
    let response = client.add(key, &value)?;

    if response.ok {
        out.success(&format!("added \"{key}\""));
        Ok(())
    } else {
        out.error(&response.error, &response.message);
        std::process::exit(1);
    }
}
