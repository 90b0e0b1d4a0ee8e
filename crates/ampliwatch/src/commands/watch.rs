//! Continuous polling: one printed sample per poll cycle.

use std::time::Duration;

use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing::warn;

use ampliwatch_core::{RouterMonitor, Snapshot};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct WatchSample {
    timestamp: Option<String>,
    download_mbps: f64,
    upload_mbps: f64,
    wifi_devices: usize,
    wired_devices: usize,
    ports_up: usize,
}

impl WatchSample {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            timestamp: snapshot
                .last_updated
                .map(|ts| ts.format("%H:%M:%S").to_string()),
            download_mbps: snapshot.wan_speeds.download_mbps,
            upload_mbps: snapshot.wan_speeds.upload_mbps,
            wifi_devices: snapshot.wifi_devices.len(),
            wired_devices: snapshot.ethernet_devices.len(),
            ports_up: snapshot
                .ethernet_ports
                .values()
                .filter(|port| port.is_link_up())
                .count(),
        }
    }
}

fn print_sample(snapshot: &Snapshot, global: &GlobalOpts) {
    let sample = WatchSample::from_snapshot(snapshot);
    let line = match global.output {
        OutputFormat::Table | OutputFormat::Plain => format!(
            "{}  down {:>9} Mbps  up {:>9} Mbps  wifi {:<3} wired {:<3} ports up {}",
            sample.timestamp.as_deref().unwrap_or("--:--:--"),
            util::format_mbps(sample.download_mbps),
            util::format_mbps(sample.upload_mbps),
            sample.wifi_devices,
            sample.wired_devices,
            sample.ports_up,
        ),
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json_compact(&sample),
        OutputFormat::Yaml => output::render_yaml(&sample),
    };
    output::print_output(&line, global.quiet);
}

/// Poll until interrupted (or `--count` times), printing one sample per
/// cycle.
///
/// A failed poll logs a warning and keeps going; AmpliFi routers drop
/// sessions across reboots and firmware updates, and the next cycle
/// re-authenticates on its own.
pub async fn handle(
    monitor: &RouterMonitor,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let every = args
        .interval
        .map_or_else(|| monitor.poll_interval(), Duration::from_secs);
    if every.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    if !global.quiet {
        eprintln!(
            "Polling {} every {}s (Ctrl-C to stop)",
            monitor.base_url(),
            every.as_secs()
        );
    }

    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut completed: u64 = 0;

    loop {
        ticker.tick().await;
        match monitor.refresh().await {
            Ok(snapshot) => print_sample(&snapshot, global),
            Err(err) => warn!("poll failed: {err}"),
        }
        completed += 1;
        if args.count.is_some_and(|count| completed >= count) {
            break;
        }
    }
    Ok(())
}
