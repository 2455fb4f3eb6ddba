//! The CLI-side client: connects to the daemon socket, sends one request,
//! reads one response.

use crate::protocol::{self, Request, Response};
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct DaemonClient {
    sock_path: PathBuf,
}

impl DaemonClient {
    pub fn new(sock_path: impl Into<PathBuf>) -> Self {
        DaemonClient {
            sock_path: sock_path.into(),
        }
    }

    /// Send `request` and return the decoded response. The read side has no
    /// fixed buffer cap — it keeps reading until a newline or EOF, so a
    /// large response is never silently truncated.
    pub fn send(&self, request: &Request) -> Result<Response> {
        let stream = UnixStream::connect(&self.sock_path)
            .with_context(|| format!("failed to connect to daemon at {}", self.sock_path.display()))?;
        stream.set_read_timeout(Some(REQUEST_TIMEOUT))?;
        stream.set_write_timeout(Some(REQUEST_TIMEOUT))?;

        let mut writer = stream.try_clone()?;
        let encoded = protocol::encode(request)?;
        writer.write_all(encoded.as_bytes())?;
        writer.flush()?;

        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).context("failed to read daemon response")?;

        let response: Response = protocol::decode(&line).context("malformed daemon response")?;
        Ok(response)
    }

    /// Send `request`; if the daemon reports `locked` and standard input is
    /// interactive, prompt for the master password, unlock, and retry once.
    pub fn send_auto_unlock(&self, request: &Request) -> Result<Response> {
        let response = self.send(request)?;
        if response.ok || response.error != "locked" || !is_interactive() {
            return Ok(response);
        }

        let password = dialoguer::Password::new()
            .with_prompt("Stash is locked, enter master password")
            .interact()?;

        let unlock_response = self.send(&Request::new("unlock").with_param("password", password))?;
        if !unlock_response.ok {
            return Ok(unlock_response);
        }

        self.send(request)
    }

    pub fn health(&self) -> Result<Response> {
        self.send(&Request::new("health"))
    }

    pub fn unlock(&self, password: &str) -> Result<Response> {
        self.send(&Request::new("unlock").with_param("password", password))
    }

    pub fn lock(&self) -> Result<Response> {
        self.send(&Request::new("lock"))
    }

    pub fn stop(&self) -> Result<Response> {
        self.send(&Request::new("stop"))
    }

    pub fn get(&self, key: &str) -> Result<Response> {
        self.send_auto_unlock(&Request::new("get").with_param("key", key))
    }

    pub fn list_keys(&self, filter: Option<&str>) -> Result<Response> {
        let mut request = Request::new("list");
        if let Some(f) = filter {
            request = request.with_param("filter", f);
        }
        self.send_auto_unlock(&request)
    }

    pub fn add(&self, key: &str, value: &str) -> Result<Response> {
        self.send_auto_unlock(&Request::new("add").with_param("key", key).with_param("value", value))
    }

    pub fn delete(&self, key: &str) -> Result<Response> {
        self.send_auto_unlock(&Request::new("delete").with_param("key", key))
    }

    pub fn rename(&self, key: &str, new_key: &str) -> Result<Response> {
        self.send_auto_unlock(
            &Request::new("rename")
                .with_param("key", key)
                .with_param("new_key", new_key),
        )
    }

    pub fn schedule_clipboard_clear(&self, value: &str) -> Result<Response> {
        self.send(&Request::new("schedule_clipboard_clear").with_param("value", value))
    }
}

fn is_interactive() -> bool {
    use std::io::IsTerminal;
    std::io::stdin().is_terminal()
}
