//! Command execution context
//!
//! Every command that touches the session builds one of these. Building it is
//! the CLI's equivalent of a page load: config is resolved, a fresh
//! [`Session`] is created over the on-disk record, and hydration starts in the
//! background.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::args::GlobalOptions;
use crate::cli::OutputFormat;
use crate::client::GuardianClient;
use crate::config::Config;
use crate::error::Result;
use crate::registry::ClientRegistry;
use crate::session::{FileStorage, Session, TabDirStorage, TabStorage, TerminalNavigator};

/// Context for command execution containing config, session, and client.
pub struct CommandContext {
    /// Resolved configuration (file + CLI/env overrides)
    pub config: Config,
    /// Session for this invocation, hydrating in the background
    pub session: Session,
    /// API client wired to the session's interceptors
    pub client: GuardianClient,
    /// Output format preference
    pub format: OutputFormat,
    data_dir: PathBuf,
    tab_id: String,
}

impl CommandContext {
    /// Resolve config and start the session.
    ///
    /// # Errors
    /// Returns error if the config file cannot be read or is invalid.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load_at(opts.config_ref())?;
        if let Some(url) = opts.api_url_ref() {
            config.api_url = url.to_string();
        }
        if let Some(dir) = opts.data_dir_ref() {
            config.data_dir = Some(PathBuf::from(dir));
        }
        config.validate()?;

        let data_dir = config.data_dir()?;
        let storage = Arc::new(FileStorage::new(&data_dir, &config.storage_key));

        // Refreshes go through the plain client so they never re-enter the
        // interceptors
        let raw_client = GuardianClient::from_config(&config)?;
        let session = Session::new(
            storage,
            Arc::new(raw_client.clone()),
            Arc::new(TerminalNavigator::default()),
        );
        let client = raw_client.with_session(&session);
        session.start(config.hydration_timeout());

        Ok(Self {
            config,
            session,
            client,
            format: opts.format,
            data_dir,
            tab_id: TabDirStorage::current_tab_id(opts.tab_id_ref()),
        })
    }

    /// Wait for the session to load, showing a spinner if it takes a while
    pub async fn ready(&self) {
        if self.session.is_ready() {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Loading session...");
        spinner.enable_steady_tick(Duration::from_millis(100));

        self.session.ready().await;
        spinner.finish_and_clear();
    }

    /// Gate a protected command on a usable session
    pub async fn require_session(&self) -> Result<()> {
        self.ready().await;
        self.session.route_guard().enforce().await
    }

    /// Open the registered clients database
    pub fn registry(&self) -> Result<ClientRegistry> {
        Ok(ClientRegistry::open_at(&self.data_dir)?)
    }

    /// Per-tab storage for this terminal
    pub fn tab_storage(&self) -> Arc<dyn TabStorage> {
        Arc::new(TabDirStorage::for_tab(&self.tab_id))
    }

    pub fn data_dir(&self) -> &std::path::Path {
        &self.data_dir
    }
}
