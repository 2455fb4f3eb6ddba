//! `minivault list` (alias `l`) — list stored keys, optionally filtered by substring.

use crate::commands::connect;
use crate::config::Config;
use crate::output::Output;
use anyhow::Result;

pub fn run(config: &Config, out: &Output, filter: Option<&str>) -> Result<()> {
    let client = connect(config)?;
    let response = client.list_keys(filter)?;

    if !response.ok {
        out.error(&response.error, &response.message);
        std::process::exit(1);
    }

    let keys: Vec<String> = response
        .data
        .get("keys")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();

    if out.is_json() {
        out.success_with_data("", serde_json::json!({ "keys": keys }));
    } else if keys.is_empty() {
        out.info("no secrets stored");
    } else {
        for key in &keys {
            println!("{key}");
        }
    }

    Ok(())
}
