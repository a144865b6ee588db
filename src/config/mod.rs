//! Configuration management for Guardian

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result, StorageError};

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Name of the durable session record
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Directory holding the session record and the clients database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Countdown threshold (seconds) below which the session timer warns
    #[serde(default = "default_token_warning_secs")]
    pub token_warning_secs: u64,

    /// Refresh the access token this many seconds before it expires
    #[serde(default = "default_refresh_ahead_secs")]
    pub refresh_ahead_secs: u64,

    /// Upper bound on waiting for durable storage at startup
    #[serde(default = "default_hydration_timeout_ms")]
    pub hydration_timeout_ms: u64,

    /// Last username used to sign in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_storage_key() -> String {
    "auth-storage".to_string()
}

fn default_token_warning_secs() -> u64 {
    60
}

fn default_refresh_ahead_secs() -> u64 {
    10
}

fn default_hydration_timeout_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            storage_key: default_storage_key(),
            data_dir: None,
            token_warning_secs: default_token_warning_secs(),
            refresh_ahead_secs: default_refresh_ahead_secs(),
            hydration_timeout_ms: default_hydration_timeout_ms(),
            username: None,
        }
    }
}

impl Config {
    /// Get the default config file path (~/.guardian/config.yaml)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".guardian").join("config.yaml"))
    }

    /// Resolve an optional override to a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration, falling back to defaults when no file exists
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to an optional override path
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(&Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Reject values the session machinery cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_url must not be empty".to_string()).into());
        }
        if self.storage_key.trim().is_empty() || self.storage_key.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "storage_key '{}' is not a valid file name",
                self.storage_key
            ))
            .into());
        }
        if self.hydration_timeout_ms == 0 {
            return Err(
                ConfigError::Invalid("hydration_timeout_ms must be positive".to_string()).into(),
            );
        }
        Ok(())
    }

    /// Directory for the session record and clients database
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        let base = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
        Ok(base.join("guardian"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn hydration_timeout(&self) -> Duration {
        Duration::from_millis(self.hydration_timeout_ms)
    }
}
