//! CLI argument parsing for minivault.
//!
//! Uses clap derive macros for type-safe argument handling.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// minivault — a personal secret stash backed by an encrypted local store and
/// a background daemon that holds the unlock key in memory.
#[derive(Parser)]
#[command(
    name = "minivault",
    about = "A personal secret stash",
    version,
    author,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Emit machine-readable JSON instead of colored human-readable output.
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the data directory (default: ~/.local/minivault).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new, empty encrypted stash.
    Init,

    /// Re-encrypt the stash under a new master password.
    ///
    /// Refuses to run while the daemon is reachable — stop it first.
    ChangePassword,

    /// Unlock the stash for the running daemon.
    Unlock,

    /// Lock the stash, wiping the cached key from daemon memory.
    Lock,

    /// Report whether the daemon is running and whether the stash is unlocked.
    #[command(alias = "h")]
    Health,

    /// Fetch a secret. Copies it to the clipboard unless `--stdout` is given.
    #[command(alias = "g")]
    Get {
        key: String,

        /// Print the value to stdout instead of copying it to the clipboard.
        #[arg(long)]
        stdout: bool,
    },

    /// List stored keys, optionally filtered by substring.
    #[command(alias = "l")]
    List {
        /// Only list keys containing this substring.
        filter: Option<String>,
    },

    /// Store or overwrite a secret.
    Add {
        key: String,

        /// Value to store. Prompted interactively when omitted.
        value: Option<String>,
    },

    /// Remove a secret.
    Delete { key: String },

    /// Rename a secret, overwriting any existing value at the destination.
    Rename { key: String, new_key: String },

    /// Stop the running daemon. Idempotent if none is running.
    Stop,

    /// Run the background daemon in the foreground. Not for direct use —
    /// invoked by the other subcommands via `ensure_daemon`.
    #[command(hide = true)]
    Daemon,
}
