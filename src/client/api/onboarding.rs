//! Authenticated backend calls

use async_trait::async_trait;

use crate::client::models::{HealthResponse, OnboardingRequest, OnboardingResponse};
use crate::error::Result;

/// Onboarding operations
#[async_trait]
pub trait GuardianApi: Send + Sync {
    /// Register a new customer
    async fn create_onboarding(&self, request: &OnboardingRequest) -> Result<OnboardingResponse>;

    /// Backend liveness
    async fn health(&self) -> Result<HealthResponse>;
}
