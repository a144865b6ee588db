//! Status command implementation

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::output::formatters::{format_remaining, format_timestamp_local};
use crate::output::json::format_json;
use crate::output::table::format_fields;
use crate::session::storage::FileStorage;
use crate::session::token;

/// Snapshot of one token for display
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenStatus {
    present: bool,
    expires_at: Option<DateTime<Utc>>,
    remaining_secs: Option<i64>,
}

impl TokenStatus {
    fn of(token: Option<&str>, now: DateTime<Utc>) -> Self {
        let expires_at = token::expiration_instant(token);
        Self {
            present: token.is_some(),
            expires_at,
            remaining_secs: expires_at.map(|exp| (exp - now).num_seconds()),
        }
    }

    fn is_valid(&self) -> bool {
        self.remaining_secs.is_some_and(|secs| secs > 0)
    }

    fn describe(&self) -> String {
        match (self.present, self.expires_at, self.remaining_secs) {
            (false, _, _) => "none".to_string(),
            (true, Some(exp), Some(secs)) if secs > 0 => format!(
                "valid, expires {} (in {})",
                format_timestamp_local(exp),
                format_remaining(secs)
            ),
            (true, Some(_), _) => "expired".to_string(),
            (true, None, _) => "unreadable".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    config_file: String,
    api_url: String,
    session_file: String,
    username: Option<String>,
    authenticated: bool,
    access_token: TokenStatus,
    refresh_token: TokenStatus,
}

/// Run the status command to display session and configuration status
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.ready().await;

    let now = Utc::now();
    let record = ctx.session.store().snapshot().await;
    let access = TokenStatus::of(record.access_token.as_deref(), now);
    let refresh = TokenStatus::of(record.refresh_token.as_deref(), now);
    let session_file = FileStorage::new(ctx.data_dir(), &ctx.config.storage_key);

    let report = StatusReport {
        config_file: Config::resolve_path(opts.config_ref())?
            .display()
            .to_string(),
        api_url: ctx.config.api_url.clone(),
        session_file: session_file.path().display().to_string(),
        username: ctx.config.username.clone(),
        authenticated: access.is_valid() || refresh.is_valid(),
        access_token: access,
        refresh_token: refresh,
    };

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&report)?),
        OutputFormat::Table => println!("{}", format_fields(&report_fields(&report))),
        OutputFormat::Pretty => print_pretty(&report),
    }

    Ok(())
}

fn report_fields(report: &StatusReport) -> Vec<(&'static str, String)> {
    vec![
        ("Config file", report.config_file.clone()),
        ("API URL", report.api_url.clone()),
        ("Session file", report.session_file.clone()),
        (
            "Username",
            report.username.clone().unwrap_or_else(|| "--".to_string()),
        ),
        ("Signed in", report.authenticated.to_string()),
        ("Access token", report.access_token.describe()),
        ("Refresh token", report.refresh_token.describe()),
    ]
}

fn print_pretty(report: &StatusReport) {
    println!("{}\n", "Guardian Session Status".bold());

    println!("Config file: {}", report.config_file.cyan());
    println!("API URL: {}", report.api_url.cyan());
    println!("Session file: {}", report.session_file.dimmed());
    println!();

    if report.authenticated {
        match &report.username {
            Some(username) => println!("{} Signed in as {}", "✓".green(), username.bold()),
            None => println!("{} Signed in", "✓".green()),
        }
    } else {
        println!("{} Not signed in", "✗".red());
        println!("  → Run '{}' to start a session", "guardian login".cyan());
    }

    print_token("Access token", &report.access_token);
    print_token("Refresh token", &report.refresh_token);
    println!();
}

fn print_token(label: &str, status: &TokenStatus) {
    let marker = if !status.present {
        "○".dimmed()
    } else if status.is_valid() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!("{} {}: {}", marker, label, status.describe());
}
