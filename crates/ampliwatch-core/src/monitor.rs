// ── Router monitor ──
//
// Owns one RouterClient plus the latest projection of its topology.
// `refresh` replaces the whole snapshot on success and leaves it untouched
// on failure, so consumers degrade to stale data instead of losing state.
// Callers are expected to run one poll at a time per router.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use ampliwatch_api::{RawTopology, RouterClient, TransportConfig};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use url::Url;

use crate::config::RouterConfig;
use crate::error::CoreError;
use crate::model::{EthernetDevice, EthernetPort, MacAddress, WanSpeeds, WifiDevice};
use crate::topology;

/// Everything projected out of one successful poll.
///
/// Rebuilt in full every time; nothing is patched incrementally, which
/// keeps a shape change between firmware responses from leaving stale
/// entries behind.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub wifi_devices: HashMap<MacAddress, WifiDevice>,
    pub ethernet_ports: HashMap<String, EthernetPort>,
    pub ethernet_devices: HashMap<MacAddress, EthernetDevice>,
    pub wan_speeds: WanSpeeds,
    /// When the last successful poll landed. `None` until the first one.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Polling front-end for one AmpliFi router.
pub struct RouterMonitor {
    client: RouterClient,
    poll_interval: Duration,
    /// The router's identity does not change between polls, so the first
    /// successful resolution is cached for the monitor's lifetime.
    router_mac: RwLock<Option<MacAddress>>,
    snapshot: RwLock<Snapshot>,
}

impl RouterMonitor {
    pub fn new(config: &RouterConfig) -> Result<Self, CoreError> {
        let base_url = config.base_url()?;
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = RouterClient::new(base_url, config.password.clone(), &transport)?;
        Ok(Self {
            client,
            poll_interval: config.poll_interval,
            router_mac: RwLock::new(None),
            snapshot: RwLock::new(Snapshot::default()),
        })
    }

    /// Fetch one topology snapshot and replace the projections.
    ///
    /// On failure the previous snapshot stays in place and the error is
    /// surfaced as "this poll failed"; the caller decides whether to retry
    /// on its next cycle.
    pub async fn refresh(&self) -> Result<Snapshot, CoreError> {
        let topology = self.client.fetch_devices().await?;

        let router_mac = self.resolve_router_mac(&topology);
        let previous_wan = self
            .snapshot
            .read()
            .expect("snapshot lock poisoned")
            .wan_speeds;

        let next = Snapshot {
            wifi_devices: topology::extract_wifi_devices(&topology),
            ethernet_ports: topology::extract_ethernet_ports(&topology, router_mac.as_ref()),
            ethernet_devices: topology::extract_ethernet_devices(&topology, router_mac.as_ref()),
            wan_speeds: topology::extract_wan_speeds(&topology, router_mac.as_ref(), previous_wan),
            last_updated: Some(Utc::now()),
        };

        debug!(
            "topology refreshed: {} wifi, {} wired, {} ports",
            next.wifi_devices.len(),
            next.ethernet_devices.len(),
            next.ethernet_ports.len()
        );

        *self.snapshot.write().expect("snapshot lock poisoned") = next.clone();
        Ok(next)
    }

    /// Validate host and password with a forced handshake. Never raises.
    pub async fn test_connection(&self) -> bool {
        self.client.test_connection().await
    }

    fn resolve_router_mac(&self, topology: &RawTopology) -> Option<MacAddress> {
        if let Some(mac) = self
            .router_mac
            .read()
            .expect("router mac lock poisoned")
            .clone()
        {
            return Some(mac);
        }

        let found = topology::find_router_mac(topology.device_tree());
        match found {
            Some(ref mac) => {
                debug!("resolved router mac {}", mac);
                *self.router_mac.write().expect("router mac lock poisoned") = Some(mac.clone());
            }
            None => warn!("no node with the Router role in the topology tree"),
        }
        found
    }

    // ── Read accessors ───────────────────────────────────────────────
    //
    // All hand out clones of the last good snapshot; a poll in flight
    // never blocks readers for longer than the final swap.

    /// Base URL the underlying client talks to.
    pub fn base_url(&self) -> &Url {
        self.client.base_url()
    }

    /// Poll cadence carried over from the config, for callers driving a loop.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read().expect("snapshot lock poisoned").clone()
    }

    pub fn wifi_devices(&self) -> HashMap<MacAddress, WifiDevice> {
        self.snapshot
            .read()
            .expect("snapshot lock poisoned")
            .wifi_devices
            .clone()
    }

    pub fn ethernet_ports(&self) -> HashMap<String, EthernetPort> {
        self.snapshot
            .read()
            .expect("snapshot lock poisoned")
            .ethernet_ports
            .clone()
    }

    pub fn ethernet_devices(&self) -> HashMap<MacAddress, EthernetDevice> {
        self.snapshot
            .read()
            .expect("snapshot lock poisoned")
            .ethernet_devices
            .clone()
    }

    pub fn wan_speeds(&self) -> WanSpeeds {
        self.snapshot
            .read()
            .expect("snapshot lock poisoned")
            .wan_speeds
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.snapshot
            .read()
            .expect("snapshot lock poisoned")
            .last_updated
    }

    /// The router MAC resolved from the first successful poll, if any.
    pub fn router_mac(&self) -> Option<MacAddress> {
        self.router_mac
            .read()
            .expect("router mac lock poisoned")
            .clone()
    }
}
