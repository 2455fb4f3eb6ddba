//! Configuration: data directory layout and the optional `config.toml` overlay.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default clipboard auto-clear timeout, in seconds.
pub const DEFAULT_CLIPBOARD_TIMEOUT: u64 = 30;
/// Default inactivity auto-lock timeout, in seconds. Zero disables the timer.
pub const DEFAULT_INACTIVITY_TIMEOUT: u64 = 0;

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    clipboard_timeout: Option<u64>,
    inactivity_timeout: Option<u64>,
}

/// Resolved configuration for one invocation: where the data directory lives
/// and the two timer durations.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub clipboard_timeout: u64,
    pub inactivity_timeout: u64,
}

impl Config {
    /// Resolve a config, overlaying `config.toml` (if present in `data_dir`)
    /// on top of the defaults. `data_dir` overrides the default of
    /// `~/.local/minivault` when given.
    pub fn build(data_dir: Option<PathBuf>) -> anyhow::Result<Config> {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        let mut config = Config {
            data_dir: data_dir.clone(),
            clipboard_timeout: DEFAULT_CLIPBOARD_TIMEOUT,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
        };

        let config_path = data_dir.join("config.toml");
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let parsed: ConfigFile = toml::from_str(&content)?;
            if let Some(v) = parsed.clipboard_timeout {
                config.clipboard_timeout = v;
            }
            if let Some(v) = parsed.inactivity_timeout {
                config.inactivity_timeout = v;
            }
        }

        Ok(config)
    }

    pub fn stash_path(&self) -> PathBuf {
        self.data_dir.join("stash.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    pub fn daemon_sock_path(&self) -> PathBuf {
        self.data_dir.join("daemon.sock")
    }

    pub fn daemon_pid_path(&self) -> PathBuf {
        self.data_dir.join("daemon.pid")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("stash.log")
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(".local")
        .join("minivault")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_config_file() {
        let dir = tempdir().unwrap();
        let config = Config::build(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.clipboard_timeout, DEFAULT_CLIPBOARD_TIMEOUT);
        assert_eq!(config.inactivity_timeout, DEFAULT_INACTIVITY_TIMEOUT);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "clipboard_timeout = 5\ninactivity_timeout = 120\n",
        )
        .unwrap();

        let config = Config::build(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.clipboard_timeout, 5);
        assert_eq!(config.inactivity_timeout, 120);
    }

    #[test]
    fn computed_paths_are_under_data_dir() {
        let dir = tempdir().unwrap();
        let config = Config::build(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.stash_path(), dir.path().join("stash.json"));
        assert_eq!(config.daemon_sock_path(), dir.path().join("daemon.sock"));
        assert_eq!(config.daemon_pid_path(), dir.path().join("daemon.pid"));
        assert_eq!(config.log_path(), dir.path().join("stash.log"));
    }
}
