//! Global CLI options shared across all commands
//!
//! Consolidates the global flags into a single struct so handlers take one
//! parameter instead of several.

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file values are merged in
/// `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.guardian/config.yaml)
    pub config: Option<String>,

    /// Backend base URL override
    pub api_url: Option<String>,

    /// Directory for the session record and clients database
    pub data_dir: Option<String>,

    /// Terminal tab identity for reload detection
    pub tab_id: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_url: cli.api_url.clone(),
            data_dir: cli.data_dir.clone(),
            tab_id: cli.tab_id.clone(),
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    pub fn api_url_ref(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    pub fn data_dir_ref(&self) -> Option<&str> {
        self.data_dir.as_deref()
    }

    pub fn tab_id_ref(&self) -> Option<&str> {
        self.tab_id.as_deref()
    }
}
