//! WAN throughput command handler.

use ampliwatch_core::RouterMonitor;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(monitor: &RouterMonitor, global: &GlobalOpts) -> Result<(), CliError> {
    monitor.refresh().await?;
    let speeds = monitor.wan_speeds();

    let out = output::render_single(
        &global.output,
        &speeds,
        |s| {
            output::render_kv(&[
                (
                    "Download",
                    format!("{} Mbps", util::format_mbps(s.download_mbps)),
                ),
                (
                    "Upload",
                    format!("{} Mbps", util::format_mbps(s.upload_mbps)),
                ),
            ])
        },
        |s| {
            format!(
                "{} {}",
                util::format_mbps(s.download_mbps),
                util::format_mbps(s.upload_mbps)
            )
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
