//! Bearer token decoding
//!
//! Tokens are JWT-shaped (`header.payload.signature`). Only the payload is
//! inspected; signatures are the backend's business. Anything that cannot be
//! decoded is treated as already expired.

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::DecodeError;

/// Claims the session manager cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Expiration, seconds since the Unix epoch
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch
    pub iat: Option<i64>,
    pub subject: Option<String>,
}

#[derive(Deserialize)]
struct RawClaims {
    exp: f64,
    #[serde(default)]
    iat: Option<f64>,
    #[serde(default)]
    sub: Option<String>,
}

/// Decode a base64 or base64url segment, with or without padding
fn decode_segment(segment: &str) -> Result<Vec<u8>, DecodeError> {
    let standard = segment
        .trim_end_matches('=')
        .replace('-', "+")
        .replace('_', "/");

    let padding = match standard.len() % 4 {
        0 => "",
        2 => "==",
        3 => "=",
        _ => return Err(DecodeError::Base64("invalid length".to_string())),
    };

    general_purpose::STANDARD
        .decode(format!("{}{}", standard, padding))
        .map_err(|e| DecodeError::Base64(e.to_string()))
}

/// Decode a token's payload claims
pub fn decode(token: &str) -> Result<TokenClaims, DecodeError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts[1].is_empty() {
        return Err(DecodeError::Malformed);
    }

    let payload = decode_segment(parts[1])?;
    let raw: RawClaims =
        serde_json::from_slice(&payload).map_err(|e| DecodeError::Payload(e.to_string()))?;

    Ok(TokenClaims {
        exp: raw.exp.floor() as i64,
        iat: raw.iat.map(|iat| iat.floor() as i64),
        subject: raw.sub,
    })
}

/// Expiration instant of a token, if present and decodable
pub fn expiration_instant(token: Option<&str>) -> Option<DateTime<Utc>> {
    let claims = decode(token?).ok()?;
    DateTime::from_timestamp(claims.exp, 0)
}

/// Whether a token is absent, undecodable or past its `exp` at `now`
pub fn is_expired(token: Option<&str>, now: DateTime<Utc>) -> bool {
    match expiration_instant(token) {
        Some(exp) => exp <= now,
        None => true,
    }
}
