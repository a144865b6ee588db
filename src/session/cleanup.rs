//! Tab-close cleanup
//!
//! A reload and a tab close both tear the page down. The reload flag, written
//! to per-tab storage right before unload, tells them apart: only a teardown
//! without the flag clears the session. Detection is best-effort; a missed
//! close leaves the session for the next explicit validation.

use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::storage::TabStorage;
use super::store::SessionStore;

/// Per-tab flag marking an in-progress reload
pub const RELOAD_FLAG_KEY: &str = "guardian_is_reload_navigation";

/// Page lifecycle events the watcher reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The page is about to unload (reload or close)
    BeforeUnload,
    /// The page is going away. `persisted` means it is kept for back/forward.
    PageHide { persisted: bool },
}

pub struct CleanupWatcher {
    store: Arc<SessionStore>,
    tab: Arc<dyn TabStorage>,
    restored_from_reload: bool,
    cleaned: AtomicBool,
}

impl CleanupWatcher {
    /// Start watching. Consumes a reload flag left by the previous page.
    pub fn mount(store: Arc<SessionStore>, tab: Arc<dyn TabStorage>) -> Self {
        let restored_from_reload = tab.take_flag(RELOAD_FLAG_KEY);
        if restored_from_reload {
            debug!("Page loaded after a reload, session kept");
        }
        Self {
            store,
            tab,
            restored_from_reload,
            cleaned: AtomicBool::new(false),
        }
    }

    pub fn restored_from_reload(&self) -> bool {
        self.restored_from_reload
    }

    /// React to a lifecycle event. Returns whether the session was cleared.
    pub async fn handle(&self, event: PageEvent) -> bool {
        match event {
            PageEvent::BeforeUnload => {
                self.tab.set_flag(RELOAD_FLAG_KEY);
                false
            }
            PageEvent::PageHide { persisted: true } => false,
            PageEvent::PageHide { persisted: false } => {
                if self.tab.has_flag(RELOAD_FLAG_KEY) {
                    debug!("Reload in progress, keeping session");
                    return false;
                }
                if self.cleaned.swap(true, Ordering::SeqCst) {
                    return false;
                }
                let cleared = self.store.clear_auth().await;
                if cleared {
                    info!("Tab closed, session cleared");
                }
                cleared
            }
        }
    }
}
