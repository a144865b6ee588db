//! Reusable formatting utilities for CLI output
//!
//! Timestamps, durations and amounts shared by the status, watch and clients
//! commands.

use chrono::{DateTime, Local, Utc};

/// Format a timestamp in local time.
///
/// # Example output
/// `01/15/2025 14:30`
pub fn format_timestamp_local(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%m/%d/%Y %H:%M")
        .to_string()
}

/// Format a remaining duration in seconds.
///
/// # Example output
/// - `2h 15m 30s` (hours, minutes, seconds)
/// - `5m 10s` (minutes, seconds)
/// - `45s` (seconds only)
/// - `expired` (zero or negative)
pub fn format_remaining(secs: i64) -> String {
    if secs <= 0 {
        return "expired".to_string();
    }

    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Format a monetary amount with two decimals and thousands separators.
///
/// # Example output
/// `1,500.50`
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}
