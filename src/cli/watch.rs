//! Watch command: the long-lived session view
//!
//! Runs the session timer with a live countdown until Ctrl-C. Stopping is
//! handled like the page going away: a plain stop is a tab close and ends
//! the session, while `--reload` marks a reload first so the next command in
//! this terminal picks the session back up.

use std::io::Write;

use colored::Colorize;
use log::debug;
use tokio::signal;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::error::Result;
use crate::session::timer::{format_countdown, is_warning};
use crate::session::{PageEvent, TimerState};

/// Run the watch command
pub async fn run(opts: &GlobalOptions, reload: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let watcher = ctx.session.cleanup_watcher(ctx.tab_storage());
    ctx.require_session().await?;

    if watcher.restored_from_reload() {
        println!("{} Resumed session after reload", "✓".green());
    }
    println!("Watching session. Press {} to stop.", "Ctrl-C".cyan());

    let timer = ctx.session.timer(ctx.config.refresh_ahead_secs);
    let handle = timer.spawn();
    let mut states = handle.states();
    let warning_secs = ctx.config.token_warning_secs;

    let logged_out = loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                debug!("Interrupted");
                break false;
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break false;
                }
                let state = *states.borrow_and_update();
                render(state, warning_secs);
                if state == TimerState::LoggedOut {
                    break true;
                }
            }
        }
    };
    drop(handle);
    println!();

    if logged_out {
        return Ok(());
    }

    if reload {
        watcher.handle(PageEvent::BeforeUnload).await;
    }
    if watcher
        .handle(PageEvent::PageHide { persisted: false })
        .await
    {
        println!("{} Session ended", "✓".green());
    } else if reload {
        println!("{} Session kept for reload", "○".dimmed());
    }

    Ok(())
}

fn render(state: TimerState, warning_secs: u64) {
    let line = match state {
        TimerState::CountingDown { remaining_secs } => {
            let countdown = format_countdown(remaining_secs);
            if is_warning(remaining_secs, warning_secs) {
                format!("Session expires in {}", countdown.red().bold())
            } else {
                format!("Session expires in {}", countdown.green())
            }
        }
        TimerState::Refreshing => format!("{}", "Renewing session...".cyan()),
        TimerState::LoggedOut => format!("{}", "Session ended".red()),
        TimerState::Idle | TimerState::NoSession => format!("{}", "No session".dimmed()),
    };

    // Pad to overwrite the previous, possibly longer, line
    print!("\r{:<40}", line);
    let _ = std::io::stdout().flush();
}
