//! Guardian backend client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::api::{AuthApi, GuardianApi};
use super::models::{
    HealthResponse, LoginRequest, LoginResponse, OnboardingRequest, OnboardingResponse,
    RefreshRequest, RefreshResponse,
};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::session::interceptor::{LOGIN_PATH, REFRESH_PATH, is_login_endpoint};
use crate::session::{CredentialInterceptor, RejectionInterceptor, Session};

const ONBOARDING_PATH: &str = "/onboarding";
const HEALTH_PATH: &str = "/health";

/// Rate limit: 360 requests per minute (6 per second)
const RATE_LIMIT_PER_SECOND: NonZeroU32 = match NonZeroU32::new(6) {
    Some(n) => n,
    None => unreachable!(),
};

/// Guardian backend API client.
///
/// A plain client sends every request as-is. A client built with
/// [`GuardianClient::with_session`] runs the session's interceptors around
/// authenticated calls.
#[derive(Clone)]
pub struct GuardianClient {
    http: HttpClient,
    base_url: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    interceptors: Option<Interceptors>,
}

#[derive(Clone)]
struct Interceptors {
    credentials: CredentialInterceptor,
    rejection: RejectionInterceptor,
}

/// Error body shape used by the backend
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GuardianClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_second(RATE_LIMIT_PER_SECOND))),
            interceptors: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, config.request_timeout())
    }

    /// A copy of this client that runs `session`'s interceptors
    pub fn with_session(&self, session: &Session) -> Self {
        Self {
            interceptors: Some(Interceptors {
                credentials: session.credential_interceptor(),
                rejection: session.rejection_interceptor(),
            }),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON response.
    ///
    /// `authenticated` requests get a bearer token from the credential
    /// interceptor; a failure there aborts the request before it is sent.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        path: &str,
        mut request: RequestBuilder,
        authenticated: bool,
    ) -> Result<T> {
        let mut bearer_sent = false;
        if authenticated {
            if let Some(interceptors) = &self.interceptors {
                if let Some(token) = interceptors.credentials.authorize().await? {
                    request = request.bearer_auth(token);
                    bearer_sent = true;
                }
            }
        }

        self.rate_limiter.until_ready().await;
        debug!("Sending request to {}", path);
        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
            });
        }

        let message = error_message(response).await;
        debug!("Request to {} failed with {}", path, status);
        match status {
            StatusCode::UNAUTHORIZED => {
                // Only a credential the backend actually saw can be rejected
                if bearer_sent {
                    if let Some(interceptors) = &self.interceptors {
                        interceptors.rejection.on_rejection(path).await;
                    }
                }
                if is_login_endpoint(path) {
                    Err(ApiError::InvalidCredentials(
                        message.unwrap_or_else(|| "Invalid credentials".to_string()),
                    )
                    .into())
                } else {
                    Err(ApiError::Unauthorized.into())
                }
            }
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => {
                Err(ApiError::NotFound(message.unwrap_or_else(|| path.to_string())).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(ApiError::BadRequest(
                message.unwrap_or_else(|| "Bad request".to_string()),
            )
            .into()),
            status if status.is_server_error() => Err(ApiError::ServerError(
                message.unwrap_or_else(|| format!("Server error: {}", status)),
            )
            .into()),
            _ => Err(ApiError::InvalidResponse(format!("Unexpected status code: {}", status)).into()),
        }
    }
}

/// The backend's `{message}` if present, else the raw body if non-empty
async fn error_message(response: reqwest::Response) -> Option<String> {
    let body = response.text().await.ok()?;
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            message: Some(message),
        }) => Some(message),
        Ok(_) => None,
        Err(_) if body.trim().is_empty() => None,
        Err(_) => Some(body),
    }
}

#[async_trait]
impl AuthApi for GuardianClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let request = self.http.post(self.url(LOGIN_PATH)).json(credentials);
        self.dispatch(LOGIN_PATH, request, false).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let request = self
            .http
            .post(self.url(REFRESH_PATH))
            .json(&RefreshRequest { refresh_token });
        self.dispatch(REFRESH_PATH, request, false).await
    }
}

#[async_trait]
impl GuardianApi for GuardianClient {
    async fn create_onboarding(&self, request: &OnboardingRequest) -> Result<OnboardingResponse> {
        let builder = self.http.post(self.url(ONBOARDING_PATH)).json(request);
        self.dispatch(ONBOARDING_PATH, builder, true).await
    }

    async fn health(&self) -> Result<HealthResponse> {
        let builder = self.http.get(self.url(HEALTH_PATH));
        self.dispatch(HEALTH_PATH, builder, true).await
    }
}
