//! Test fixtures for bearer tokens and backend responses
//!
//! Import via `use crate::client::fixtures::*` in test modules.

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Duration, Utc};

use super::models::RefreshResponse;

/// Header segment shared by every fixture token (`{"alg":"HS256","typ":"JWT"}`)
const HEADER: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";

/// Build a token whose payload segment encodes `payload_json` verbatim.
///
/// Uses padded standard base64, like tokens minted by a browser's `btoa`.
pub fn token_with_payload(payload_json: &str) -> String {
    format!(
        "{}.{}.fixture-signature",
        HEADER,
        general_purpose::STANDARD.encode(payload_json)
    )
}

/// Build a token expiring at `exp`
pub fn token_expiring_at(exp: DateTime<Utc>) -> String {
    token_with_payload(&format!(
        r#"{{"sub":"admin","iat":{},"exp":{}}}"#,
        exp.timestamp() - 300,
        exp.timestamp()
    ))
}

/// Build a token expiring `offset` from now (negative = already expired)
pub fn token_expiring_in(offset: Duration) -> String {
    token_expiring_at(Utc::now() + offset)
}

/// A freshly issued, rotated token pair (15 minute access, 8 hour refresh)
pub fn refreshed_pair() -> RefreshResponse {
    RefreshResponse {
        access_token: token_expiring_in(Duration::minutes(15)),
        refresh_token: Some(token_with_payload(&format!(
            r#"{{"sub":"admin","typ":"refresh","exp":{}}}"#,
            (Utc::now() + Duration::hours(8)).timestamp()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token;

    #[test]
    fn test_fixture_tokens_decode() {
        let exp = DateTime::from_timestamp(1_900_000_000, 0).unwrap();
        let claims = token::decode(&token_expiring_at(exp)).unwrap();
        assert_eq!(claims.exp, 1_900_000_000);
        assert_eq!(claims.subject.as_deref(), Some("admin"));
    }

    #[test]
    fn test_refreshed_pair_is_valid_and_rotated() {
        let pair = refreshed_pair();
        let now = Utc::now();
        assert!(!token::is_expired(Some(&pair.access_token), now));
        assert!(!token::is_expired(pair.refresh_token.as_deref(), now));
        assert_ne!(Some(pair.access_token), pair.refresh_token);
    }
}
