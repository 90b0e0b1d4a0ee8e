//! Wi-Fi device command handlers.

use tabled::Tabled;

use ampliwatch_core::{RouterMonitor, WifiDevice};

use crate::cli::{GlobalOpts, WifiArgs, WifiCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct WifiRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Access Point")]
    access_point: String,
}

impl From<&WifiDevice> for WifiRow {
    fn from(device: &WifiDevice) -> Self {
        Self {
            name: device.display_name(),
            mac: device.mac.to_string(),
            ip: device.ip_address().unwrap_or("-").to_owned(),
            access_point: device.connected_to.to_string(),
        }
    }
}

fn detail(device: &WifiDevice) -> String {
    output::render_kv(&[
        ("Name", device.display_name()),
        ("MAC", device.mac.to_string()),
        ("IP", device.ip_address().unwrap_or("-").to_owned()),
        ("Access point", device.connected_to.to_string()),
    ])
}

/// Devices sorted by display name for stable output.
fn sorted_devices(monitor: &RouterMonitor) -> Vec<WifiDevice> {
    let mut devices: Vec<WifiDevice> = monitor.wifi_devices().into_values().collect();
    devices.sort_by_key(WifiDevice::display_name);
    devices
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    monitor: &RouterMonitor,
    args: WifiArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    monitor.refresh().await?;

    match args.command {
        WifiCommand::List => {
            let devices = sorted_devices(monitor);
            let out = output::render_list(&global.output, &devices, |d| WifiRow::from(d), |d| {
                d.mac.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        WifiCommand::Get { device } => {
            let devices = sorted_devices(monitor);
            let found = devices.iter().find(|d| {
                d.mac.as_str().eq_ignore_ascii_case(&device) || d.display_name() == device
            });
            match found {
                Some(d) => {
                    let out =
                        output::render_single(&global.output, d, detail, |d| d.mac.to_string());
                    output::print_output(&out, global.quiet);
                    Ok(())
                }
                None => Err(CliError::NotFound {
                    resource_type: "wifi device".into(),
                    identifier: device,
                    list_command: "wifi list".into(),
                }),
            }
        }
    }
}
