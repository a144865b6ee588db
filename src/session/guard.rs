//! Route guard for protected commands

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::navigator::{LogoutReason, Navigator};
use super::restorer::SessionRestorer;
use super::store::SessionStore;
use super::token;
use crate::error::{Result, SessionError};

/// What a protected command should do right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    /// Hydration or restoration still pending
    Loading,
    Allow,
    /// No usable credential; send the user to sign in
    Redirect,
}

#[derive(Clone)]
pub struct RouteGuard {
    store: Arc<SessionStore>,
    restorer: Arc<SessionRestorer>,
    navigator: Arc<dyn Navigator>,
}

impl RouteGuard {
    pub fn new(
        store: Arc<SessionStore>,
        restorer: Arc<SessionRestorer>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            restorer,
            navigator,
        }
    }

    pub async fn check(&self, now: DateTime<Utc>) -> GuardVerdict {
        if !self.store.is_hydrated() || !self.restorer.is_restored() {
            return GuardVerdict::Loading;
        }

        let record = self.store.snapshot().await;
        let usable = !token::is_expired(record.access_token.as_deref(), now)
            || !token::is_expired(record.refresh_token.as_deref(), now);
        if usable {
            GuardVerdict::Allow
        } else {
            GuardVerdict::Redirect
        }
    }

    /// Wait out loading, then allow or redirect
    pub async fn enforce(&self) -> Result<()> {
        self.restorer.wait_restored().await;
        match self.check(Utc::now()).await {
            GuardVerdict::Allow => Ok(()),
            GuardVerdict::Loading | GuardVerdict::Redirect => {
                self.navigator.redirect_to_login(LogoutReason::NotSignedIn);
                Err(SessionError::LoginRequired.into())
            }
        }
    }
}
