//! Request and response models for the Guardian backend

mod auth;
mod onboarding;

pub use auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
pub use onboarding::{HealthResponse, OnboardingRequest, OnboardingResponse};
