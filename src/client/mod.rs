//! Guardian backend API client
//!
//! This module provides:
//! - `api`: Trait definitions for the auth and onboarding calls
//! - `models`: Request and response types
//! - `guardian`: The reqwest implementation, optionally wired to a session
//! - `mock`: Mock auth client for testing (test-only)
//! - `fixtures`: Token and response builders for tests (test-only)

pub mod api;
pub mod guardian;
pub mod models;

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;

pub use api::{AuthApi, GuardianApi};
pub use guardian::GuardianClient;
