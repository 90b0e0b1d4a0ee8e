// Wire model for the AmpliFi topology response.
//
// `POST /info-async.php` answers with one JSON array whose entries carry
// meaning by position. The indices are a fixed contract with the router
// firmware, so they are named here and validated once at construction
// instead of being sprinkled across the extraction code.

use serde_json::Value;

use crate::error::Error;

/// Index of the device/role topology tree (arbitrary depth, the router
/// node is marked with a `role` field).
pub const DEVICE_TREE_IDX: usize = 0;
/// Index of the wifi-devices tree (access point → band → network type →
/// client MAC → attributes).
pub const WIFI_TREE_IDX: usize = 1;
/// Index of the flat device-info map (device MAC → attributes).
pub const DEVICE_INFO_IDX: usize = 2;
/// Index of the ethernet port assignments (router MAC → device MAC → port).
pub const PORT_ASSIGNMENTS_IDX: usize = 3;
/// Index of the ethernet-ports tree (router MAC → port id → port info).
pub const ETHERNET_PORTS_IDX: usize = 4;
/// Minimum number of entries the firmware is known to send.
pub const TOPOLOGY_LEN: usize = 5;

/// One topology snapshot as returned by the router.
///
/// Construction validates the positional contract; a response that is not
/// an array, or is shorter than [`TOPOLOGY_LEN`], is rejected loudly
/// rather than silently mis-indexed. The accessors hand out the raw JSON
/// subtrees; flattening them into typed maps is `ampliwatch-core`'s job.
#[derive(Debug, Clone)]
pub struct RawTopology {
    entries: Vec<Value>,
}

impl RawTopology {
    /// Validate a parsed JSON value against the positional contract.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        let Value::Array(entries) = value else {
            return Err(Error::DataFetch {
                message: format!("expected a JSON array, got {}", value_kind(&value)),
            });
        };
        if entries.len() < TOPOLOGY_LEN {
            return Err(Error::DataFetch {
                message: format!(
                    "topology array has {} entries, expected at least {TOPOLOGY_LEN}",
                    entries.len()
                ),
            });
        }
        Ok(Self { entries })
    }

    /// The device/role topology tree.
    pub fn device_tree(&self) -> &Value {
        self.entry(DEVICE_TREE_IDX)
    }

    /// The wifi-devices tree.
    pub fn wifi_tree(&self) -> &Value {
        self.entry(WIFI_TREE_IDX)
    }

    /// The flat device-info map.
    pub fn device_info(&self) -> &Value {
        self.entry(DEVICE_INFO_IDX)
    }

    /// The ethernet port assignments.
    pub fn port_assignments(&self) -> &Value {
        self.entry(PORT_ASSIGNMENTS_IDX)
    }

    /// The ethernet-ports tree.
    pub fn ethernet_ports(&self) -> &Value {
        self.entry(ETHERNET_PORTS_IDX)
    }

    fn entry(&self, idx: usize) -> &Value {
        self.entries.get(idx).expect("length checked in from_value")
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_five_entries() {
        let topology = RawTopology::from_value(json!([{}, {}, {}, {}, {}])).unwrap();
        assert!(topology.device_tree().is_object());
        assert!(topology.ethernet_ports().is_object());
    }

    #[test]
    fn accepts_extra_trailing_entries() {
        let value = json!([{}, {}, {}, {}, {}, {"future": true}]);
        assert!(RawTopology::from_value(value).is_ok());
    }

    #[test]
    fn rejects_short_array() {
        let result = RawTopology::from_value(json!([{}, {}]));
        match result {
            Err(Error::DataFetch { ref message }) => {
                assert!(message.contains("2 entries"), "got: {message}");
            }
            other => panic!("expected DataFetch error, got: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_array() {
        let result = RawTopology::from_value(json!({"status": "ok"}));
        match result {
            Err(Error::DataFetch { ref message }) => {
                assert!(message.contains("an object"), "got: {message}");
            }
            other => panic!("expected DataFetch error, got: {other:?}"),
        }
    }
}
