//! Local registry of onboarded customers
//!
//! Every successful onboarding is recorded in a SQLite database next to the
//! session file so `guardian clients` can list, inspect and prune them later.

pub mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::models::{OnboardingRequest, OnboardingResponse};

pub use storage::ClientRegistry;

/// A customer registered through `guardian onboard`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredClient {
    /// Backend onboarding id
    pub id: String,
    pub name: String,
    pub document: String,
    pub email: String,
    pub initial_amount: f64,
    pub status: String,
    pub registered_at: DateTime<Utc>,
}

impl RegisteredClient {
    pub fn from_onboarding(request: &OnboardingRequest, response: &OnboardingResponse) -> Self {
        Self {
            id: response.onboarding_id.clone(),
            name: request.name.clone(),
            document: request.document.clone(),
            email: request.email.clone(),
            initial_amount: request.initial_amount,
            status: response.status.clone(),
            registered_at: Utc::now(),
        }
    }
}
