//! API traits for the Guardian backend

mod auth;
mod onboarding;

pub use auth::AuthApi;
pub use onboarding::GuardianApi;
