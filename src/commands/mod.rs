pub mod add;
pub mod change_password;
pub mod daemon;
pub mod delete;
pub mod get;
pub mod health;
pub mod init;
pub mod list;
pub mod lock;
pub mod rename;
pub mod stop;
pub mod unlock;

use crate::config::Config;
use crate::daemon::{process, DaemonClient};
use anyhow::Result;

/// Resolve config, ensure a daemon is running for it, and return a client
/// bound to its socket. Shared by every subcommand that needs a live daemon.
pub fn connect(config: &Config) -> Result<DaemonClient> {
    process::ensure_daemon(config)?;
    Ok(DaemonClient::new(config.daemon_sock_path()))
}
