//! The background daemon: socket server, process supervision, and the client
//! used by the CLI to talk to a running daemon.

pub mod client;
pub mod process;
pub mod server;
mod timers;

pub use client::DaemonClient;
pub use server::DaemonServer;
