// ── Connected-device domain types ──
//
// The wifi tree and the device-info map spell their keys differently
// (`HostName` vs `host_name`), so each type carries its own display-name
// key order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::mac::MacAddress;

/// One wifi client, flattened out of the 4-level tree the router reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WifiDevice {
    pub mac: MacAddress,
    /// MAC of the access point this client is associated with.
    pub connected_to: MacAddress,
    /// Attributes exactly as reported (`Description`, `HostName`,
    /// `Address`, signal fields, ...).
    pub attrs: Map<String, Value>,
}

impl WifiDevice {
    /// Best human-readable name: description, then hostname, then the IP
    /// address, then the MAC itself.
    pub fn display_name(&self) -> String {
        named_or_mac(
            &self.attrs,
            &["Description", "HostName", "Address"],
            &self.mac,
        )
    }

    /// The client's IP address, if the router knows it.
    pub fn ip_address(&self) -> Option<&str> {
        str_attr(&self.attrs, "Address")
    }

    /// A non-empty string attribute by key.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        str_attr(&self.attrs, key)
    }
}

/// One wired client, joined from the port-assignment and device-info trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthernetDevice {
    pub mac: MacAddress,
    /// Port the router reports the device on, e.g. `eth-1`.
    pub connected_to_port: String,
    /// Attributes exactly as reported (`description`, `host_name`, `ip`, ...).
    pub attrs: Map<String, Value>,
}

impl EthernetDevice {
    /// Best human-readable name, same order as wifi but with the
    /// device-info map's lowercase keys.
    pub fn display_name(&self) -> String {
        named_or_mac(&self.attrs, &["description", "host_name", "ip"], &self.mac)
    }

    /// The device's IP address, if the router knows it.
    pub fn ip_address(&self) -> Option<&str> {
        str_attr(&self.attrs, "ip")
    }

    /// A non-empty string attribute by key.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        str_attr(&self.attrs, key)
    }
}

fn str_attr<'a>(attrs: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    attrs
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn named_or_mac(attrs: &Map<String, Value>, keys: &[&str], mac: &MacAddress) -> String {
    keys.iter()
        .find_map(|key| str_attr(attrs, key))
        .map_or_else(|| mac.to_string(), ToOwned::to_owned)
}
