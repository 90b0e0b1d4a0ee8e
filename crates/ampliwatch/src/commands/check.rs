//! Connection check handler.

use ampliwatch_core::RouterMonitor;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Force a full login handshake and report the result.
pub async fn handle(monitor: &RouterMonitor, global: &GlobalOpts) -> Result<(), CliError> {
    if monitor.test_connection().await {
        if !global.quiet {
            eprintln!("✓ Router at {} accepted the password", monitor.base_url());
        }
        Ok(())
    } else {
        Err(CliError::CheckFailed {
            url: monitor.base_url().to_string(),
        })
    }
}
