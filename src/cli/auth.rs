//! Login and logout commands

use chrono::Utc;
use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::client::models::LoginRequest;
use crate::config::Config;
use crate::error::Result;
use crate::session::GuardVerdict;

/// Run the login command
pub async fn login(
    opts: &GlobalOptions,
    username: Option<String>,
    password: Option<String>,
    force: bool,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.ready().await;

    if !force && ctx.session.route_guard().check(Utc::now()).await == GuardVerdict::Allow {
        println!(
            "{} Already signed in. Use {} to sign in again.",
            "✓".green(),
            "--force".cyan()
        );
        return Ok(());
    }

    let theme = ColorfulTheme::default();
    let username = match username {
        Some(username) => username,
        None => {
            let mut prompt = Input::<String>::with_theme(&theme).with_prompt("Username");
            if let Some(last) = ctx.config.username.clone() {
                prompt = prompt.default(last);
            }
            prompt.interact_text()?
        }
    };

    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&theme)
            .with_prompt("Password")
            .interact()?,
    };

    let credentials = LoginRequest::new(username.trim(), password);
    ctx.session.login(&ctx.client, &credentials).await?;

    // Only the username is written back; CLI and env overrides stay out of the file
    let mut saved = Config::load_at(opts.config_ref())?;
    if saved.username.as_deref() != Some(credentials.username.as_str()) {
        saved.username = Some(credentials.username.clone());
        saved.save_at(opts.config_ref())?;
    }

    println!("{} Signed in as {}", "✓".green(), credentials.username.bold());
    Ok(())
}

/// Run the logout command
pub async fn logout(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if ctx.session.logout().await {
        println!("{} Signed out", "✓".green());
    } else {
        println!("{} No active session", "○".dimmed());
    }
    Ok(())
}
