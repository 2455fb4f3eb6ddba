//! `minivault daemon` (hidden) — run the background server in the foreground.
//!
//! This is the entry point `process::ensure_daemon` spawns detached; it is
//! not meant to be invoked directly by users.

use crate::config::Config;
use crate::daemon::DaemonServer;
use anyhow::Result;
use tokio::signal::unix::{signal, SignalKind};

pub fn run(config: Config) -> Result<()> {
    crate::log::init(&config.log_path());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let server = DaemonServer::new(config)?;

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            result = server.run() => result?,
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }

        server.shutdown().await;
        Ok(())
    })
}
