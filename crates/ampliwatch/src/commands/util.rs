//! Shared helpers for command handlers.

use chrono::{DateTime, Utc};

use crate::error::CliError;

/// Format a rate in Mbps the way the router's own UI rounds it.
pub fn format_mbps(mbps: f64) -> String {
    format!("{mbps:.3}")
}

/// Format a poll timestamp for human-facing output.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Render a port link state, colored when the terminal supports it.
pub fn link_state(up: bool, color: bool) -> String {
    use owo_colors::OwoColorize;

    match (up, color) {
        (true, true) => "up".green().to_string(),
        (true, false) => "up".to_owned(),
        (false, true) => "down".red().to_string(),
        (false, false) => "down".to_owned(),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
