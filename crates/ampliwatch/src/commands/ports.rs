//! Ethernet port command handler.

use tabled::Tabled;

use ampliwatch_core::{EthernetPort, RouterMonitor};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    id: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "RX Mbps")]
    rx: String,
    #[tabled(rename = "TX Mbps")]
    tx: String,
}

/// Bitrates arrive in kbps; display follows the WAN sensor convention.
fn rate(bitrate: Option<f64>) -> String {
    bitrate.map_or_else(|| "-".to_owned(), |kbps| util::format_mbps(kbps / 1024.0))
}

pub async fn handle(monitor: &RouterMonitor, global: &GlobalOpts) -> Result<(), CliError> {
    monitor.refresh().await?;

    let mut ports: Vec<EthernetPort> = monitor.ethernet_ports().into_values().collect();
    ports.sort_by(|a, b| a.id.cmp(&b.id));

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &ports,
        |port| PortRow {
            id: port.id.clone(),
            link: util::link_state(port.is_link_up(), color),
            rx: rate(port.rx_bitrate()),
            tx: rate(port.tx_bitrate()),
        },
        |port| port.id.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
