//! The daemon's Unix-socket server: accept loop, per-connection dispatch,
//! and the two timers (inactivity auto-lock, clipboard auto-clear).

use crate::clipboard;
use crate::config::Config;
use crate::daemon::timers::Timer;
use crate::error::StashError;
use crate::protocol::{self, Request, Response};
use crate::stash::Stash;
use anyhow::{Context, Result};
use serde_json::json;
use std::os::unix::fs::PermissionsExt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tracing::{info, warn};

struct SharedState {
    stash: Mutex<Stash>,
    inactivity_timer: Mutex<Timer>,
    clipboard_timer: Mutex<Timer>,
    last_clipboard_value: Mutex<Option<String>>,
    inactivity_timeout: Duration,
    clipboard_timeout: Duration,
    /// Notified by the `stop` dispatch arm to break `DaemonServer::run`'s accept loop.
    stop_notify: Notify,
}

/// Owns the listening socket and the shared in-process stash; runs the
/// accept loop until `shutdown` is invoked.
pub struct DaemonServer {
    listener: UnixListener,
    config: Config,
    state: Arc<SharedState>,
}

impl DaemonServer {
    /// Bind the socket, removing any stale one first, and write the PID file.
    pub fn new(config: Config) -> Result<Self> {
        let sock_path = config.daemon_sock_path();
        if sock_path.exists() {
            std::fs::remove_file(&sock_path)
                .with_context(|| format!("failed to remove stale socket at {}", sock_path.display()))?;
        }

        let listener = UnixListener::bind(&sock_path)
            .with_context(|| format!("failed to bind socket at {}", sock_path.display()))?;

        let mut perms = std::fs::metadata(&sock_path)?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(&sock_path, perms)?;

        super::process::write_pid_file(&config.daemon_pid_path(), std::process::id())?;

        let stash = Stash::new(config.stash_path());
        let state = Arc::new(SharedState {
            stash: Mutex::new(stash),
            inactivity_timer: Mutex::new(Timer::new()),
            clipboard_timer: Mutex::new(Timer::new()),
            last_clipboard_value: Mutex::new(None),
            inactivity_timeout: Duration::from_secs(config.inactivity_timeout),
            clipboard_timeout: Duration::from_secs(config.clipboard_timeout),
            stop_notify: Notify::new(),
        });

        Ok(DaemonServer {
            listener,
            config,
            state,
        })
    }

    /// Accept connections until the `stop` command (or the caller) requests
    /// shutdown; see [`Self::shutdown`].
    pub async fn run(&self) -> Result<()> {
        info!("daemon listening on {}", self.config.daemon_sock_path().display());
        arm_inactivity_timer(&self.state);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, _addr) = accepted?;
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_client(stream, state).await {
                            warn!("connection error: {e}");
                        }
                    });
                }
                _ = self.state.stop_notify.notified() => {
                    info!("stop requested, leaving accept loop");
                    return Ok(());
                }
            }
        }
    }

    /// Cancel timers, lock the stash, and remove the socket + PID files.
    pub async fn shutdown(&self) {
        info!("daemon shutting down");
        self.state.inactivity_timer.lock().unwrap().cancel();
        self.state.clipboard_timer.lock().unwrap().cancel();
        self.state.stash.lock().unwrap().lock();
        let _ = std::fs::remove_file(self.config.daemon_sock_path());
        let _ = std::fs::remove_file(self.config.daemon_pid_path());
    }
}

async fn handle_client(stream: UnixStream, state: Arc<SharedState>) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            return Ok(()); // client closed the connection
        }

        let response = match protocol::decode::<Request>(&line) {
            Ok(request) => {
                let shutdown_requested = request.command == "stop";
                let response = dispatch(&request, &state);
                reset_inactivity_timer(&state);
                let encoded = protocol::encode(&response)?;
                write_half.write_all(encoded.as_bytes()).await?;
                write_half.flush().await?;
                if shutdown_requested {
                    return Ok(());
                }
                continue;
            }
            Err(e) => Response::err("invalid_request", format!("malformed request: {e}")),
        };

        let encoded = protocol::encode(&response)?;
        write_half.write_all(encoded.as_bytes()).await?;
        write_half.flush().await?;
    }
}

fn dispatch(request: &Request, state: &Arc<SharedState>) -> Response {
    let result = dispatch_inner(request, state);
    match result {
        Ok(response) => response,
        Err(e) => Response::err(e.code(), e.to_string()),
    }
}

fn dispatch_inner(request: &Request, state: &Arc<SharedState>) -> crate::error::Result<Response> {
    let param = |name: &str| -> crate::error::Result<String> {
        request
            .params
            .get(name)
            .cloned()
            .ok_or_else(|| StashError::InvalidRequest(format!("missing parameter: {name}")))
    };

    match request.command.as_str() {
        "unlock" => {
            let password = param("password")?;
            state.stash.lock().unwrap().unlock(&password)?;
            Ok(Response::ok())
        }
        "lock" => {
            state.stash.lock().unwrap().lock();
            state.clipboard_timer.lock().unwrap().cancel();
            *state.last_clipboard_value.lock().unwrap() = None;
            Ok(Response::ok())
        }
        "get" => {
            let key = param("key")?;
            match state.stash.lock().unwrap().get(&key)? {
                Some(value) => {
                    let mut data = std::collections::HashMap::new();
                    data.insert("value".to_string(), json!(value));
                    Ok(Response::ok_with_data(data))
                }
                None => Err(StashError::NotFound(key)),
            }
        }
        "list" => {
            let filter = request.params.get("filter").cloned();
            let keys = state.stash.lock().unwrap().list_keys(filter.as_deref())?;
            let mut data = std::collections::HashMap::new();
            data.insert("keys".to_string(), json!(keys));
            Ok(Response::ok_with_data(data))
        }
        "add" => {
            let key = param("key")?;
            let value = param("value")?;
            state.stash.lock().unwrap().add(&key, &value)?;
            Ok(Response::ok())
        }
        "delete" => {
            let key = param("key")?;
            if state.stash.lock().unwrap().delete(&key)? {
                Ok(Response::ok())
            } else {
                Err(StashError::NotFound(key))
            }
        }
        "rename" => {
            let key = param("key")?;
            let new_key = param("new_key")?;
            state.stash.lock().unwrap().rename(&key, &new_key)?;
            Ok(Response::ok())
        }
        "health" => {
            let unlocked = state.stash.lock().unwrap().is_unlocked();
            let mut data = std::collections::HashMap::new();
            data.insert("unlocked".to_string(), json!(unlocked));
            Ok(Response::ok_with_data(data))
        }
        "schedule_clipboard_clear" => {
            let value = param("value")?;
            arm_clipboard_timer(state, value);
            Ok(Response::ok())
        }
        "stop" => {
            state.stop_notify.notify_one();
            Ok(Response::ok())
        }
        other => Err(StashError::UnknownCommand(other.to_string())),
    }
}

fn reset_inactivity_timer(state: &Arc<SharedState>) {
    let state_for_fire = Arc::clone(state);
    let duration = state.inactivity_timeout;
    state.inactivity_timer.lock().unwrap().reset(duration, async move {
        info!("inactivity timeout reached, locking stash");
        state_for_fire.stash.lock().unwrap().lock();
        state_for_fire.clipboard_timer.lock().unwrap().cancel();
        *state_for_fire.last_clipboard_value.lock().unwrap() = None;
    });
}

fn arm_inactivity_timer(state: &Arc<SharedState>) {
    reset_inactivity_timer(state);
}

fn arm_clipboard_timer(state: &Arc<SharedState>, expected_value: String) {
    *state.last_clipboard_value.lock().unwrap() = Some(expected_value.clone());
    let duration = state.clipboard_timeout;
    state.clipboard_timer.lock().unwrap().reset(duration, async move {
        if let Err(e) = clipboard::clear_if_unchanged(&expected_value) {
            warn!("failed to clear clipboard: {e}");
        }
    });
}
