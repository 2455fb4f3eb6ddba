//! `minivault get` (alias `g`) — fetch a secret, copying it to the clipboard
//! by default or printing it with `--stdout`.

use crate::clipboard;
use crate::commands::connect;
use crate::config::Config;
use crate::output::Output;
use anyhow::{anyhow, Result};

pub fn run(config: &Config, out: &Output, key: &str, to_stdout: bool) -> Result<()> {
    let client = connect(config)?;
    let response = client.get(key)?;

    if !response.ok {
        out.error(&response.error, &response.message);
        std::process::exit(1);
    }

    let value = response
        .data
        .get("value")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("daemon response missing value"))?
        .to_string();

    if to_stdout {
        if out.is_json() {
            out.success_with_data("", serde_json::json!({ "key": key, "value": value }));
        } else {
            println!("{value}");
        }
        return Ok(());
    }

    clipboard::copy(&value)?;
    client.schedule_clipboard_clear(&value)?;
    out.success(&format!("copied \"{key}\" to clipboard"));
    Ok(())
}
