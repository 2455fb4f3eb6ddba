//! Process supervision: PID file management, liveness probing, spawning a
//! detached daemon, and stopping it.

use crate::config::Config;
use crate::daemon::DaemonClient;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const POLL_TIMEOUT: Duration = Duration::from_secs(5);
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);
const STOP_TIMEOUT: Duration = Duration::from_secs(3);

/// Whether a Unix socket at `sock_path` currently accepts connections.
///
/// A local-socket connect either succeeds or fails immediately (no partial
/// handshake to wait out), so this is a single attempt rather than a
/// poll loop; `CONNECT_TIMEOUT` exists as documentation of the contract
/// client callers rely on (see `client.rs`) rather than code here.
pub fn is_connectable(sock_path: &Path) -> bool {
    UnixStream::connect(sock_path).is_ok()
}

/// Write the PID file atomically (temp file + rename).
pub fn write_pid_file(pid_path: &Path, pid: u32) -> Result<()> {
    let tmp_path = pid_path.with_extension("tmp");
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(&tmp_path)?;
    write!(file, "{pid}")?;
    file.sync_all()?;
    fs::rename(&tmp_path, pid_path)?;
    Ok(())
}

pub fn read_pid_file(pid_path: &Path) -> Option<u32> {
    fs::read_to_string(pid_path).ok()?.trim().parse().ok()
}

/// Is the OS-reported process for this PID still alive?
pub fn pid_is_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

/// Best-effort check that the daemon is reachable, either by socket or by PID.
pub fn is_daemon_running(config: &Config) -> bool {
    if is_connectable(&config.daemon_sock_path()) {
        return true;
    }
    match read_pid_file(&config.daemon_pid_path()) {
        Some(pid) => pid_is_alive(pid),
        None => false,
    }
}

/// Remove stale socket and PID files left behind by a crashed or already-stopped daemon.
pub fn cleanup_files(config: &Config) {
    let _ = fs::remove_file(config.daemon_sock_path());
    let _ = fs::remove_file(config.daemon_pid_path());
}

/// Ensure a daemon is running for `config`, spawning one if not. Polls the
/// socket every 50ms up to a 5s deadline.
pub fn ensure_daemon(config: &Config) -> Result<()> {
    if is_connectable(&config.daemon_sock_path()) {
        return Ok(());
    }

    cleanup_files(config);

    let exe = std::env::current_exe().context("failed to resolve current executable")?;
    std::process::Command::new(exe)
        .arg("daemon")
        .arg("--data-dir")
        .arg(&config.data_dir)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .context("failed to spawn daemon process")?;

    let deadline = Instant::now() + POLL_TIMEOUT;
    while Instant::now() < deadline {
        if is_connectable(&config.daemon_sock_path()) {
            return Ok(());
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    anyhow::bail!("daemon did not become reachable within {:?}", POLL_TIMEOUT)
}

/// Stop the daemon: send SIGTERM to the PID (if known and alive), poll for
/// exit, fall back to SIGKILL, then remove stale files.
pub fn stop_daemon(config: &Config) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let pid = read_pid_file(&config.daemon_pid_path());

    match pid {
        Some(pid) if pid_is_alive(pid) => {
            let nix_pid = Pid::from_raw(pid as i32);
            kill(nix_pid, Signal::SIGTERM).context("failed to send SIGTERM")?;

            let deadline = Instant::now() + STOP_TIMEOUT;
            while Instant::now() < deadline {
                if !pid_is_alive(pid) {
                    cleanup_files(config);
                    return Ok(());
                }
                std::thread::sleep(STOP_POLL_INTERVAL);
            }

            let _ = kill(nix_pid, Signal::SIGKILL);
            cleanup_files(config);
            Ok(())
        }
        _ => {
            // No PID on record, but the socket might still answer — ask it to stop
            // itself and wait for it to actually go away before cleaning up. The
            // `stop` command drives the daemon's own shutdown sequence (which
            // removes these files itself), so this is a backstop, not the primary
            // cleanup path.
            if is_connectable(&config.daemon_sock_path()) {
                let _ = DaemonClient::new(config.daemon_sock_path()).stop();

                let deadline = Instant::now() + STOP_TIMEOUT;
                while Instant::now() < deadline {
                    if !is_connectable(&config.daemon_sock_path()) {
                        break;
                    }
                    std::thread::sleep(STOP_POLL_INTERVAL);
                }
            }
            cleanup_files(config);
            Ok(())
        }
    }
}
