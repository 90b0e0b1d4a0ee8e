// ── Ethernet port domain types ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Port id of the WAN uplink on every AmpliFi model.
pub const WAN_PORT: &str = "eth-0";

/// One physical ethernet port on the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthernetPort {
    pub id: String,
    /// Attributes exactly as reported (`link`, `speed`, bitrates, ...).
    pub attrs: Map<String, Value>,
}

impl EthernetPort {
    /// Whether the router reports carrier on this port.
    pub fn is_link_up(&self) -> bool {
        self.attrs
            .get("link")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn rx_bitrate(&self) -> Option<f64> {
        self.attrs.get("rx_bitrate").and_then(Value::as_f64)
    }

    pub fn tx_bitrate(&self) -> Option<f64> {
        self.attrs.get("tx_bitrate").and_then(Value::as_f64)
    }
}

/// WAN throughput in Mbit/s, converted from the router's native rate unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WanSpeeds {
    pub download_mbps: f64,
    pub upload_mbps: f64,
}
