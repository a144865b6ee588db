//! Session restorer
//!
//! Runs once per process after hydration and settles the authenticated flag.

use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::hydration::Latch;
use super::store::SessionStore;

pub struct SessionRestorer {
    store: Arc<SessionStore>,
    started: AtomicBool,
    restored: Latch,
}

impl SessionRestorer {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self {
            store,
            started: AtomicBool::new(false),
            restored: Latch::new(),
        }
    }

    /// Wait for hydration, then restore. Later calls return immediately.
    pub async fn run(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        self.store.hydration_gate().wait().await;
        self.store.validate_and_restore_session().await;
        debug!(
            "Session restored (authenticated: {})",
            self.store.is_authenticated().await
        );
        self.restored.open();
    }

    pub fn is_restored(&self) -> bool {
        self.restored.is_open()
    }

    pub async fn wait_restored(&self) {
        self.restored.wait().await;
    }
}
