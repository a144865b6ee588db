//! One-shot readiness latches
//!
//! A [`Latch`] starts pending and opens exactly once. It backs the hydration
//! gate (durable storage has been read) and the restorer's "restored" signal.

use tokio::sync::watch;

/// Two-state latch: pending, then ready forever
#[derive(Debug)]
pub struct Latch {
    ready: watch::Sender<bool>,
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

impl Latch {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self { ready }
    }

    pub fn is_open(&self) -> bool {
        *self.ready.borrow()
    }

    /// Open the latch. Returns `true` only for the call that opened it.
    pub fn open(&self) -> bool {
        self.ready.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        })
    }

    /// Wait until the latch is open
    pub async fn wait(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|ready| *ready).await;
    }
}
