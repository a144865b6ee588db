//! Error types for the Guardian CLI

use thiserror::Error;

/// Result type alias for Guardian operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// The login call itself was rejected; carries the backend's message.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Credentials rejected by the server. Run `guardian login` to sign in again.")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Session lifecycle errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Sign-in required. Run `guardian login` to start a session.")]
    LoginRequired,

    #[error("Session expired: no refresh token available")]
    MissingRefreshToken,
}

/// Token decoding failures. Never shown to users directly; a token that fails
/// to decode is simply treated as expired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("token is not in header.payload.signature form")]
    Malformed,

    #[error("token payload is not valid base64: {0}")]
    Base64(String),

    #[error("token payload is not valid JSON: {0}")]
    Payload(String),
}

/// Durable session storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not determine a data directory for session storage")]
    NoDataDir,

    #[error("Session storage I/O error: {0}")]
    Io(String),

    #[error("Stored session is corrupt: {0}")]
    Corrupt(String),
}

/// Registered clients database errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Client registry database error: {0}")]
    Database(String),

    #[error("Client registry I/O error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for RegistryError {
    fn from(err: rusqlite::Error) -> Self {
        RegistryError::Database(err.to_string())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_shows_backend_message() {
        let err = ApiError::InvalidCredentials("Credenciales inválidas".to_string());
        assert_eq!(err.to_string(), "Credenciales inválidas");
    }

    #[test]
    fn test_unauthorized_points_to_login() {
        let err = ApiError::Unauthorized;
        assert!(err.to_string().contains("guardian login"));
    }

    #[test]
    fn test_login_required_points_to_login() {
        let err = SessionError::LoginRequired;
        assert!(err.to_string().contains("guardian login"));
    }

    #[test]
    fn test_api_error_bad_request() {
        let err = ApiError::BadRequest("Email inválido".to_string());
        assert!(err.to_string().contains("Email inválido"));
    }

    #[test]
    fn test_decode_error_messages() {
        assert!(DecodeError::Malformed.to_string().contains("header.payload"));
        let err = DecodeError::Payload("missing field `exp`".to_string());
        assert!(err.to_string().contains("exp"));
    }

    #[test]
    fn test_error_from_session_error() {
        let err: Error = SessionError::MissingRefreshToken.into();
        match err {
            Error::Session(SessionError::MissingRefreshToken) => (),
            _ => panic!("Expected Error::Session(SessionError::MissingRefreshToken)"),
        }
    }

    #[test]
    fn test_registry_error_from_sqlite() {
        let err: RegistryError = rusqlite::Error::QueryReturnedNoRows.into();
        match err {
            RegistryError::Database(_) => (),
            _ => panic!("Expected RegistryError::Database"),
        }
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_str = "invalid: [yaml: content";
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}
