//! Mock authentication client for testing
//!
//! Provides a mock implementation of [`AuthApi`] so session components can be
//! exercised without a backend.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::api::AuthApi;
use super::fixtures::refreshed_pair;
use super::models::{LoginRequest, LoginResponse, RefreshResponse};
use crate::error::{ApiError, Result};

/// Mock auth client for testing.
///
/// Configure expected responses via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockAuthClient::new()
///     .with_refresh_error(ApiError::Unauthorized)
///     .await;
///
/// assert!(mock.refresh("r").await.is_err());
/// ```
#[derive(Default)]
pub struct MockAuthClient {
    /// Token pair to return from login
    login_response: Arc<Mutex<Option<LoginResponse>>>,
    /// Error to return from login - consumed on first use
    login_error: Arc<Mutex<Option<ApiError>>>,
    /// Response to return from refresh
    refresh_response: Arc<Mutex<Option<RefreshResponse>>>,
    /// Error to return from refresh - consumed on first use
    refresh_error: Arc<Mutex<Option<ApiError>>>,
    /// Simulated backend latency for refresh
    refresh_delay: Arc<Mutex<Option<Duration>>>,
    /// Refresh tokens presented, in call order
    refresh_tokens_seen: Arc<Mutex<Vec<String>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub login: usize,
    pub refresh: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.login + self.refresh
    }
}

impl MockAuthClient {
    /// Create a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the token pair returned from login.
    pub async fn with_login_response(self, response: LoginResponse) -> Self {
        *self.login_response.lock().await = Some(response);
        self
    }

    /// Configure an error for the next login call.
    pub async fn with_login_error(self, error: ApiError) -> Self {
        *self.login_error.lock().await = Some(error);
        self
    }

    /// Configure the response returned from refresh.
    pub async fn with_refresh_response(self, response: RefreshResponse) -> Self {
        *self.refresh_response.lock().await = Some(response);
        self
    }

    /// Configure an error for the next refresh call.
    pub async fn with_refresh_error(self, error: ApiError) -> Self {
        *self.refresh_error.lock().await = Some(error);
        self
    }

    /// Delay every refresh call, to widen race windows.
    pub async fn with_refresh_delay(self, delay: Duration) -> Self {
        *self.refresh_delay.lock().await = Some(delay);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Refresh tokens presented to refresh, in call order.
    pub async fn refresh_tokens_seen(&self) -> Vec<String> {
        self.refresh_tokens_seen.lock().await.clone()
    }
}

#[async_trait]
impl AuthApi for MockAuthClient {
    async fn login(&self, _credentials: &LoginRequest) -> Result<LoginResponse> {
        self.call_count.lock().await.login += 1;

        if let Some(e) = self.login_error.lock().await.take() {
            return Err(e.into());
        }

        let response = self.login_response.lock().await;
        Ok(response.clone().unwrap_or_else(|| {
            let pair = refreshed_pair();
            LoginResponse {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token.unwrap_or_default(),
            }
        }))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse> {
        self.call_count.lock().await.refresh += 1;
        self.refresh_tokens_seen
            .lock()
            .await
            .push(refresh_token.to_string());

        let delay = *self.refresh_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(e) = self.refresh_error.lock().await.take() {
            return Err(e.into());
        }

        let response = self.refresh_response.lock().await;
        Ok(response.clone().unwrap_or_else(refreshed_pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_responses() {
        let mock = MockAuthClient::new();
        let login = mock
            .login(&LoginRequest::new("admin", "admin123"))
            .await
            .unwrap();
        assert!(!login.access_token.is_empty());

        let refreshed = mock.refresh("r-1").await.unwrap();
        assert!(refreshed.refresh_token.is_some());

        let counts = mock.call_counts().await;
        assert_eq!(counts.login, 1);
        assert_eq!(counts.refresh, 1);
        assert_eq!(counts.total(), 2);
        assert_eq!(mock.refresh_tokens_seen().await, vec!["r-1"]);
    }

    #[tokio::test]
    async fn test_mock_error_consumed_after_use() {
        let mock = MockAuthClient::new()
            .with_refresh_error(ApiError::Unauthorized)
            .await;

        assert!(mock.refresh("r").await.is_err());
        assert!(mock.refresh("r").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_login_error() {
        let mock = MockAuthClient::new()
            .with_login_error(ApiError::InvalidCredentials("Invalid credentials".to_string()))
            .await;

        let err = mock
            .login(&LoginRequest::new("admin", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
    }
}
