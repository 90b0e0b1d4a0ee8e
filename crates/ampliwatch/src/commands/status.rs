//! Status command handler: one poll, one summary screen.

use serde::Serialize;

use ampliwatch_core::{EthernetPort, RouterMonitor, WAN_PORT};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StatusView {
    router_mac: Option<String>,
    wan_link_up: bool,
    download_mbps: f64,
    upload_mbps: f64,
    wifi_devices: usize,
    wired_devices: usize,
    ports_up: usize,
    ports_total: usize,
    last_updated: Option<String>,
}

fn detail(view: &StatusView) -> String {
    let pairs = [
        (
            "Router",
            view.router_mac
                .clone()
                .unwrap_or_else(|| "(unresolved)".to_owned()),
        ),
        (
            "WAN link",
            if view.wan_link_up { "up" } else { "down" }.to_owned(),
        ),
        (
            "Download",
            format!("{} Mbps", util::format_mbps(view.download_mbps)),
        ),
        (
            "Upload",
            format!("{} Mbps", util::format_mbps(view.upload_mbps)),
        ),
        ("Wi-Fi devices", view.wifi_devices.to_string()),
        ("Wired devices", view.wired_devices.to_string()),
        ("Ports up", format!("{}/{}", view.ports_up, view.ports_total)),
        (
            "Updated",
            view.last_updated.clone().unwrap_or_else(|| "-".to_owned()),
        ),
    ];
    output::render_kv(&pairs)
}

pub async fn handle(monitor: &RouterMonitor, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = monitor.refresh().await?;

    let view = StatusView {
        router_mac: monitor.router_mac().map(|mac| mac.to_string()),
        wan_link_up: snapshot
            .ethernet_ports
            .get(WAN_PORT)
            .is_some_and(EthernetPort::is_link_up),
        download_mbps: snapshot.wan_speeds.download_mbps,
        upload_mbps: snapshot.wan_speeds.upload_mbps,
        wifi_devices: snapshot.wifi_devices.len(),
        wired_devices: snapshot.ethernet_devices.len(),
        ports_up: snapshot
            .ethernet_ports
            .values()
            .filter(|port| port.is_link_up())
            .count(),
        ports_total: snapshot.ethernet_ports.len(),
        last_updated: snapshot.last_updated.map(util::format_timestamp),
    };

    let out = output::render_single(&global.output, &view, detail, |v| {
        v.router_mac.clone().unwrap_or_else(|| "-".to_owned())
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
