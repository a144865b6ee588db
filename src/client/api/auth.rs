//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::{LoginRequest, LoginResponse, RefreshResponse};
use crate::error::Result;

/// Credential issuance calls. Neither call carries a bearer token.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange a username and password for a token pair
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse>;

    /// Exchange a refresh token for fresh credentials
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse>;
}
