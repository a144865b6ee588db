//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod auth;
pub mod clients;
pub mod completions;
pub mod context;
pub mod health;
pub mod onboard;
pub mod status;
pub mod watch;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// Guardian - session-aware client for the customer onboarding backend
#[derive(Parser, Debug)]
#[command(name = "guardian")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "GUARDIAN_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "GUARDIAN_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the backend base URL
    #[arg(long, global = true, env = "GUARDIAN_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Override the directory holding the session and clients database
    #[arg(long, global = true, env = "GUARDIAN_DATA_DIR", hide_env = true)]
    pub data_dir: Option<String>,

    /// Terminal tab identity used to tell reloads from closes
    #[arg(long, global = true, env = "GUARDIAN_TAB_ID", hide_env = true)]
    pub tab_id: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "GUARDIAN_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and start a session
    Login {
        /// Username (prompted when omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long, short = 'p', env = "GUARDIAN_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Sign in again even if the current session is still valid
        #[arg(long)]
        force: bool,
    },

    /// End the current session
    Logout,

    /// Show session and configuration status
    Status,

    /// Keep the session alive with a live expiry countdown
    #[command(after_help = "\
Press Ctrl-C to stop. Stopping ends the session, as closing the tab would.
With --reload the session is kept for the next command in this terminal.")]
    Watch {
        /// Treat Ctrl-C as a reload: keep the session
        #[arg(long)]
        reload: bool,
    },

    /// Register a new customer
    Onboard {
        /// Full name (at least 3 characters)
        #[arg(long)]
        name: String,

        /// Identity document number (at least 5 characters)
        #[arg(long)]
        document: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Initial deposit amount
        #[arg(long)]
        amount: f64,
    },

    /// Manage locally registered customers
    #[command(subcommand)]
    Clients(ClientsCommands),

    /// Check backend availability
    Health,

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Install:
  bash:   guardian completion bash > /etc/bash_completion.d/guardian
  zsh:    guardian completion zsh > \"${fpath[1]}/_guardian\"
  fish:   guardian completion fish > ~/.config/fish/completions/guardian.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Registered customer subcommands
#[derive(Subcommand, Debug)]
pub enum ClientsCommands {
    /// List registered customers, newest first
    List,

    /// Show one registered customer
    Get {
        /// Onboarding id
        id: String,
    },

    /// Remove one registered customer
    Remove {
        /// Onboarding id
        id: String,
    },

    /// Remove every registered customer
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
