//! Registered customer commands

use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::cli::{ClientsCommands, CommandContext, OutputFormat};
use crate::error::{ApiError, Result};
use crate::models::ClientDisplay;
use crate::output::Formattable;
use crate::output::json::format_json;
use crate::output::table::format_fields;

/// Dispatch a `clients` subcommand. Every subcommand needs a session.
pub async fn run(opts: &GlobalOptions, command: ClientsCommands) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.require_session().await?;

    match command {
        ClientsCommands::List => list(&ctx),
        ClientsCommands::Get { id } => get(&ctx, &id),
        ClientsCommands::Remove { id } => remove(&ctx, &id),
        ClientsCommands::Clear { yes } => clear(&ctx, yes),
    }
}

fn list(ctx: &CommandContext) -> Result<()> {
    let clients = ctx.registry()?.list()?;

    if ctx.format == OutputFormat::Json {
        println!("{}", format_json(&clients)?);
        return Ok(());
    }

    let display: Vec<ClientDisplay> = clients.iter().map(ClientDisplay::from).collect();
    display.print(ctx.format)
}

fn get(ctx: &CommandContext, id: &str) -> Result<()> {
    let client = ctx
        .registry()?
        .get(id)?
        .ok_or_else(|| ApiError::NotFound(format!("registered client '{}'", id)))?;

    if ctx.format == OutputFormat::Json {
        println!("{}", format_json(&client)?);
    } else {
        println!("{}", format_fields(&ClientDisplay::from(&client).fields()));
    }
    Ok(())
}

fn remove(ctx: &CommandContext, id: &str) -> Result<()> {
    if ctx.registry()?.remove(id)? {
        println!("{} Removed {}", "✓".green(), id);
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("registered client '{}'", id)).into())
    }
}

fn clear(ctx: &CommandContext, yes: bool) -> Result<()> {
    let registry = ctx.registry()?;

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Remove every registered client?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let removed = registry.clear()?;
    println!("{} Removed {} registered client(s)", "✓".green(), removed);
    Ok(())
}
