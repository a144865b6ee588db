//! Request and response interceptors
//!
//! Local expiry checks only decide *when* to ask the backend for fresh
//! credentials. A backend rejection is the only thing that ends a session
//! because a credential is actually invalid.

use log::{debug, warn};
use std::sync::Arc;

use super::navigator::{LogoutReason, Navigator};
use super::refresh::Refresher;
use super::store::SessionStore;
use crate::error::Result;

/// Path of the sign-in endpoint
pub const LOGIN_PATH: &str = "/auth/login";

/// Path of the token refresh endpoint
pub const REFRESH_PATH: &str = "/auth/refresh";

pub fn is_login_endpoint(path: &str) -> bool {
    path.trim_end_matches('/').ends_with(LOGIN_PATH)
}

/// Runs before each outgoing authenticated request
#[derive(Clone)]
pub struct CredentialInterceptor {
    store: Arc<SessionStore>,
    refresher: Arc<Refresher>,
}

impl CredentialInterceptor {
    pub fn new(store: Arc<SessionStore>, refresher: Arc<Refresher>) -> Self {
        Self { store, refresher }
    }

    /// Bearer token to attach, if any.
    ///
    /// Errors mean the session could not be renewed; it has already been
    /// cleared and the request must not be sent.
    pub async fn authorize(&self) -> Result<Option<String>> {
        if !self.store.is_hydrated() {
            debug!("Session not hydrated yet, sending request without credentials");
            return Ok(None);
        }

        let record = self.store.snapshot().await;
        match (record.access_token, record.refresh_token) {
            (None, None) => Ok(None),
            (None, Some(_)) => {
                debug!("No access token, refreshing");
                self.refresher.refresh().await.map(Some)
            }
            (Some(access), _) if !self.store.is_token_expired(Some(&access)) => Ok(Some(access)),
            (Some(_), _) => {
                debug!("Access token expired locally, refreshing");
                self.refresher.refresh().await.map(Some)
            }
        }
    }
}

/// Runs after each response carrying an authorization rejection
#[derive(Clone)]
pub struct RejectionInterceptor {
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl RejectionInterceptor {
    pub fn new(store: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Handle a 401 for `path`. Returns whether the session was ended.
    ///
    /// A rejected sign-in is left to the caller: there is no session to end.
    pub async fn on_rejection(&self, path: &str) -> bool {
        if is_login_endpoint(path) {
            debug!("Sign-in rejected, leaving session untouched");
            return false;
        }

        warn!("Backend rejected credentials for {}", path);
        let ended = self.store.clear_auth().await;
        if ended {
            self.navigator.redirect_to_login(LogoutReason::Rejected);
        }
        ended
    }
}
