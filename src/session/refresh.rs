//! Token refresh shared by the request interceptor and the session timer

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::navigator::{LogoutReason, Navigator};
use super::store::SessionStore;
use crate::client::AuthApi;
use crate::error::{Result, SessionError};

/// Exchanges the stored refresh token for new credentials.
///
/// Refreshes are single-flight: concurrent callers queue on a mutex, and a
/// caller that finds the refresh token already rotated by the one ahead of it
/// reuses the new access token instead of calling the backend again.
pub struct Refresher {
    store: Arc<SessionStore>,
    auth: Arc<dyn AuthApi>,
    navigator: Arc<dyn Navigator>,
    in_flight: Mutex<()>,
}

impl Refresher {
    pub fn new(
        store: Arc<SessionStore>,
        auth: Arc<dyn AuthApi>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            auth,
            navigator,
            in_flight: Mutex::new(()),
        }
    }

    /// Obtain a fresh access token.
    ///
    /// Any failure (backend rejection, unreachable backend, no refresh token)
    /// ends the session and is returned to the caller unchanged.
    pub async fn refresh(&self) -> Result<String> {
        let seen = self.store.refresh_token().await;
        let _guard = self.in_flight.lock().await;

        let current = self.store.snapshot().await;
        if current.refresh_token.is_some() && current.refresh_token != seen {
            if let Some(access) = current.access_token.as_deref() {
                if !self.store.is_token_expired(Some(access)) {
                    debug!("Token already refreshed by a concurrent caller");
                    return Ok(access.to_string());
                }
            }
        }

        let Some(refresh_token) = current.refresh_token else {
            self.end_session(LogoutReason::MissingRefreshToken).await;
            return Err(SessionError::MissingRefreshToken.into());
        };

        match self.auth.refresh(&refresh_token).await {
            Ok(response) => {
                let access = response.access_token.clone();
                match response.refresh_token {
                    Some(rotated) => self.store.set_tokens(response.access_token, rotated).await,
                    None => self.store.set_access_token(response.access_token).await,
                }
                info!("Access token refreshed");
                Ok(access)
            }
            Err(err) => {
                warn!("Token refresh failed: {}", err);
                self.end_session(LogoutReason::RefreshFailed).await;
                Err(err)
            }
        }
    }

    /// Clear the session and redirect, but only if there was one to clear
    pub async fn end_session(&self, reason: LogoutReason) {
        if self.store.clear_auth().await {
            self.navigator.redirect_to_login(reason);
        }
    }
}
