//! Customer onboarding models

use serde::{Deserialize, Serialize};

/// New customer registration. Wire names follow the backend contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingRequest {
    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(rename = "documento")]
    pub document: String,

    pub email: String,

    #[serde(rename = "montoInicial")]
    pub initial_amount: f64,
}

impl OnboardingRequest {
    /// Client-side form rules, checked before anything is sent
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().chars().count() < 3 {
            return Err("name must be at least 3 characters".to_string());
        }
        if self.document.trim().chars().count() < 5 {
            return Err("document must be at least 5 characters".to_string());
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(format!("'{}' is not a valid email address", self.email));
        }
        if !(self.initial_amount.is_finite() && self.initial_amount > 0.0) {
            return Err("initial amount must be positive".to_string());
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Backend acknowledgement of a registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingResponse {
    #[serde(rename = "onboardingId")]
    pub onboarding_id: String,

    pub status: String,
}

/// Health endpoint payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OnboardingRequest {
        OnboardingRequest {
            name: "Ana Torres".to_string(),
            document: "12345678".to_string(),
            email: "ana@example.com".to_string(),
            initial_amount: 1500.0,
        }
    }

    #[test]
    fn test_wire_names() {
        let body = serde_json::to_value(request()).unwrap();
        assert_eq!(body["nombre"], "Ana Torres");
        assert_eq!(body["documento"], "12345678");
        assert_eq!(body["montoInicial"], 1500.0);

        let response: OnboardingResponse =
            serde_json::from_str(r#"{"onboardingId":"mock-1","status":"REQUESTED"}"#).unwrap();
        assert_eq!(response.onboarding_id, "mock-1");
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_validation_rules() {
        let short_name = OnboardingRequest {
            name: "Al".to_string(),
            ..request()
        };
        assert!(short_name.validate().unwrap_err().contains("name"));

        let short_document = OnboardingRequest {
            document: "123".to_string(),
            ..request()
        };
        assert!(short_document.validate().unwrap_err().contains("document"));

        for email in ["ana", "ana@", "@example.com", "ana@example", "a b@example.com"] {
            let bad = OnboardingRequest {
                email: email.to_string(),
                ..request()
            };
            assert!(bad.validate().is_err(), "{email}");
        }

        for amount in [0.0, -10.0, f64::NAN] {
            let bad = OnboardingRequest {
                initial_amount: amount,
                ..request()
            };
            assert!(bad.validate().unwrap_err().contains("amount"));
        }
    }
}
