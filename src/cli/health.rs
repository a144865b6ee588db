//! Backend health check

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::{CommandContext, OutputFormat};
use crate::client::GuardianApi;
use crate::error::Result;
use crate::output::json::format_json;

/// Run the health command. Needs no session.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.ready().await;
    let health = ctx.client.health().await?;

    if ctx.format == OutputFormat::Json {
        println!("{}", format_json(&health)?);
    } else if health.ok {
        println!("{} {} is up", "✓".green(), ctx.config.api_url.cyan());
    } else {
        println!("{} {} reports unhealthy", "✗".red(), ctx.config.api_url.cyan());
    }

    Ok(())
}
