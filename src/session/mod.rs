//! Client-side session lifecycle
//!
//! [`Session`] wires the store to its consumers. One is built per process:
//! [`Session::start`] hydrates from durable storage and runs the restorer in
//! the background, while interceptors, the timer, the cleanup watcher and the
//! route guard are handed out as needed. Every consumer shares the same
//! [`SessionStore`].

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub mod cleanup;
pub mod guard;
pub mod hydration;
pub mod interceptor;
pub mod navigator;
pub mod refresh;
pub mod restorer;
pub mod storage;
pub mod store;
pub mod timer;
pub mod token;

pub use cleanup::{CleanupWatcher, PageEvent};
pub use guard::{GuardVerdict, RouteGuard};
pub use interceptor::{CredentialInterceptor, RejectionInterceptor};
pub use navigator::{LogoutReason, Navigator, TerminalNavigator};
pub use refresh::Refresher;
pub use restorer::SessionRestorer;
pub use storage::{DurableStorage, FileStorage, TabDirStorage, TabStorage};
pub use store::{SessionRecord, SessionStore};
pub use timer::{SessionTimer, TimerState};

use crate::client::AuthApi;
use crate::client::models::LoginRequest;
use crate::error::Result;

pub struct Session {
    store: Arc<SessionStore>,
    restorer: Arc<SessionRestorer>,
    refresher: Arc<Refresher>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    /// `auth` performs refreshes and must not itself run the session's
    /// interceptors.
    pub fn new(
        storage: Arc<dyn DurableStorage>,
        auth: Arc<dyn AuthApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let store = Arc::new(SessionStore::new(storage));
        let restorer = Arc::new(SessionRestorer::new(store.clone()));
        let refresher = Arc::new(Refresher::new(store.clone(), auth, navigator.clone()));
        Self {
            store,
            restorer,
            refresher,
            navigator,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Hydrate and restore in the background
    pub fn start(&self, fallback: Duration) -> JoinHandle<()> {
        let store = self.store.clone();
        let restorer = self.restorer.clone();
        tokio::spawn(async move {
            store.hydrate(fallback).await;
            restorer.run().await;
        })
    }

    /// Wait until the session has been hydrated and restored
    pub async fn ready(&self) {
        self.restorer.wait_restored().await;
    }

    pub fn is_ready(&self) -> bool {
        self.restorer.is_restored()
    }

    pub fn credential_interceptor(&self) -> CredentialInterceptor {
        CredentialInterceptor::new(self.store.clone(), self.refresher.clone())
    }

    pub fn rejection_interceptor(&self) -> RejectionInterceptor {
        RejectionInterceptor::new(self.store.clone(), self.navigator.clone())
    }

    pub fn timer(&self, refresh_ahead_secs: u64) -> Arc<SessionTimer> {
        Arc::new(SessionTimer::new(
            self.store.clone(),
            self.refresher.clone(),
            refresh_ahead_secs,
        ))
    }

    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(
            self.store.clone(),
            self.restorer.clone(),
            self.navigator.clone(),
        )
    }

    pub fn cleanup_watcher(&self, tab: Arc<dyn TabStorage>) -> CleanupWatcher {
        CleanupWatcher::mount(self.store.clone(), tab)
    }

    /// Sign in and store the issued pair as-is
    pub async fn login(&self, auth: &dyn AuthApi, credentials: &LoginRequest) -> Result<()> {
        let tokens = auth.login(credentials).await?;
        self.store
            .set_tokens(tokens.access_token, tokens.refresh_token)
            .await;
        log::info!("Signed in as {}", credentials.username);
        Ok(())
    }

    /// End the session. Returns whether there was one.
    pub async fn logout(&self) -> bool {
        self.store.hydration_gate().wait().await;
        self.store.clear_auth().await
    }
}
