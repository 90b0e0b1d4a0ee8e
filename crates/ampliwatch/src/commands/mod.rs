//! Command dispatch: bridges CLI args -> monitor calls -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod ports;
pub mod status;
pub mod util;
pub mod wan;
pub mod watch;
pub mod wifi;
pub mod wired;

use ampliwatch_core::RouterMonitor;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    monitor: &RouterMonitor,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(monitor, global).await,
        Command::Wifi(args) => wifi::handle(monitor, args, global).await,
        Command::Wired => wired::handle(monitor, global).await,
        Command::Ports => ports::handle(monitor, global).await,
        Command::Wan => wan::handle(monitor, global).await,
        Command::Watch(args) => watch::handle(monitor, args, global).await,
        Command::Check => check::handle(monitor, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
