//! Guardian CLI - session-aware client for the customer onboarding backend

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod models;
mod output;
mod registry;
mod session;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Login {
            username,
            password,
            force,
        } => cli::auth::login(&opts, username, password, force).await,
        Commands::Logout => cli::auth::logout(&opts).await,
        Commands::Status => cli::status::run(&opts).await,
        Commands::Watch { reload } => cli::watch::run(&opts, reload).await,
        Commands::Onboard {
            name,
            document,
            email,
            amount,
        } => cli::onboard::run(&opts, name, document, email, amount).await,
        Commands::Clients(command) => cli::clients::run(&opts, command).await,
        Commands::Health => cli::health::run(&opts).await,
        Commands::Version => {
            println!("guardian version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Completion { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
    }
}

/// `RUST_LOG` wins; `--debug` raises the default from warnings to debug
fn init_logging(debug: bool) {
    let default_filter = if debug { "guardian=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
