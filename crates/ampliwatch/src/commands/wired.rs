//! Wired device command handler.

use tabled::Tabled;

use ampliwatch_core::{EthernetDevice, RouterMonitor};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct WiredRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Port")]
    port: String,
}

impl From<&EthernetDevice> for WiredRow {
    fn from(device: &EthernetDevice) -> Self {
        Self {
            name: device.display_name(),
            mac: device.mac.to_string(),
            ip: device.ip_address().unwrap_or("-").to_owned(),
            port: device.connected_to_port.clone(),
        }
    }
}

pub async fn handle(monitor: &RouterMonitor, global: &GlobalOpts) -> Result<(), CliError> {
    monitor.refresh().await?;

    let mut devices: Vec<EthernetDevice> = monitor.ethernet_devices().into_values().collect();
    devices.sort_by_key(EthernetDevice::display_name);

    let out = output::render_list(&global.output, &devices, |d| WiredRow::from(d), |d| {
        d.mac.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
