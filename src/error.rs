//! Stash-level error type.
//!
//! Every fallible stash operation surfaces one of these variants. Each carries
//! a stable machine-readable code (used on the wire protocol, see
//! [`crate::protocol`]) alongside a human-readable message.

use thiserror::Error;

/// Errors produced by the stash engine, the store, and the daemon dispatch layer.
#[derive(Debug, Error)]
pub enum StashError {
    #[error("stash is not initialized")]
    NotInitialized,

    #[error("stash is already initialized")]
    AlreadyInitialized,

    #[error("stash is locked")]
    Locked,

    #[error("wrong password")]
    WrongPassword,

    #[error("stash file is corrupted: {0}")]
    Corrupted(String),

    #[error("password must not be empty")]
    EmptyPassword,

    #[error("key must not be empty")]
    EmptyKey,

    #[error("value must not be empty")]
    EmptyValue,

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("daemon is running, stop it before changing the password")]
    DaemonRunning,

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StashError {
    /// The stable machine-readable code carried on the wire and used by
    /// callers that need to branch on error kind rather than message text.
    pub fn code(&self) -> &'static str {
        match self {
            StashError::NotInitialized => "not_initialized",
            StashError::AlreadyInitialized => "already_initialized",
            StashError::Locked => "locked",
            StashError::WrongPassword => "wrong_password",
            StashError::Corrupted(_) => "corrupted",
            StashError::EmptyPassword => "empty_password",
            StashError::EmptyKey => "empty_key",
            StashError::EmptyValue => "empty_value",
            StashError::NotFound(_) => "not_found",
            StashError::InvalidRequest(_) => "invalid_request",
            StashError::UnknownCommand(_) => "unknown_command",
            StashError::DaemonRunning => "daemon_running",
            StashError::Internal(_) => "internal",
            StashError::Io(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, StashError>;
