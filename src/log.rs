//! Daemon logging setup: rotating file output via `tracing-subscriber` +
//! `tracing-appender`.

use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;

static INIT: OnceLock<WorkerGuard> = OnceLock::new();

/// Install a process-wide subscriber writing to a daily-rotating file under
/// `log_path`'s parent directory. Safe to call more than once; only the
/// first call takes effect.
pub fn init(log_path: &Path) {
    if INIT.get().is_some() {
        return;
    }

    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("stash.log");

    let file_appender = tracing_appender::rolling::daily(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        let _ = INIT.set(guard);
    }
}
