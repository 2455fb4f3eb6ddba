//! Cancel-and-replace timer handles for the inactivity and clipboard timers.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// A single pending timer, represented as an abortable task handle. Resetting
/// cancels whatever was pending and arms a fresh one.
pub struct Timer {
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn new() -> Self {
        Timer { handle: None }
    }

    /// Cancel any pending timer without arming a new one.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Cancel any pending timer and arm a new one that runs `on_fire` after
    /// `duration`. A `duration` of zero disables the timer (it is simply
    /// left cancelled).
    pub fn reset<F>(&mut self, duration: Duration, on_fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        if duration.is_zero() {
            return;
        }
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            on_fire.await;
        }));
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}
