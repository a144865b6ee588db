//! Customer onboarding command

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::GuardianApi;
use crate::client::models::OnboardingRequest;
use crate::error::{Error, Result};
use crate::models::ClientDisplay;
use crate::output::json::format_json;
use crate::output::table::format_fields;
use crate::registry::RegisteredClient;

/// Run the onboard command.
///
/// The form is checked locally before the session is required, so bad input
/// never costs a refresh.
pub async fn run(
    opts: &GlobalOptions,
    name: String,
    document: String,
    email: String,
    amount: f64,
) -> Result<()> {
    let request = OnboardingRequest {
        name: name.trim().to_string(),
        document: document.trim().to_string(),
        email: email.trim().to_string(),
        initial_amount: amount,
    };
    request.validate().map_err(Error::Validation)?;

    let ctx = CommandContext::new(opts)?;
    ctx.require_session().await?;

    let response = ctx.client.create_onboarding(&request).await?;
    let client = RegisteredClient::from_onboarding(&request, &response);
    ctx.registry()?.add(&client)?;
    log::info!("Registered onboarding {}", client.id);

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&client)?),
        OutputFormat::Table => println!("{}", format_fields(&ClientDisplay::from(&client).fields())),
        OutputFormat::Pretty => {
            println!(
                "{} Registered {} (onboarding {})",
                "✓".green(),
                client.name.bold(),
                client.id.cyan()
            );
            println!("  Status: {}", client.status);
        }
    }

    Ok(())
}
