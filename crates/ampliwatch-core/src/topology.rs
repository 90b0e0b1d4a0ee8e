// ── Topology extraction ──
//
// Pure functions from one `RawTopology` snapshot to the typed maps that
// consumers read. No network I/O, no state. A missing or empty
// substructure means an empty result, never an error: the router omits
// whole subtrees when nothing is connected to them.

use std::collections::HashMap;

use ampliwatch_api::RawTopology;
use serde_json::Value;

use crate::model::{EthernetDevice, EthernetPort, MacAddress, WAN_PORT, WanSpeeds, WifiDevice};

/// Nodes deeper than this are ignored when searching for the router.
/// Real trees are two or three levels; the bound only guards against a
/// malformed response recursing without end.
pub const MAX_SEARCH_DEPTH: usize = 32;

/// Depth-first search for the first node claiming the `Router` role.
///
/// A match must carry both `role == "Router"` and a `mac` field; a role
/// marker without a MAC is skipped and the search continues. Traversal
/// follows document order, each node before its children.
pub fn find_router_mac(node: &Value) -> Option<MacAddress> {
    find_router_mac_at(node, 0)
}

fn find_router_mac_at(node: &Value, depth: usize) -> Option<MacAddress> {
    if depth >= MAX_SEARCH_DEPTH {
        return None;
    }
    match node {
        Value::Object(map) => {
            if map.get("role").and_then(Value::as_str) == Some("Router") {
                if let Some(mac) = map.get("mac").and_then(Value::as_str) {
                    return Some(MacAddress::from(mac));
                }
            }
            map.values()
                .find_map(|child| find_router_mac_at(child, depth + 1))
        }
        Value::Array(items) => items
            .iter()
            .find_map(|child| find_router_mac_at(child, depth + 1)),
        _ => None,
    }
}

/// Flatten the 4-level wifi tree (access point → band → network type →
/// client MAC) into one map. Later entries win on MAC collision.
pub fn extract_wifi_devices(topology: &RawTopology) -> HashMap<MacAddress, WifiDevice> {
    let mut devices = HashMap::new();
    let Some(access_points) = topology.wifi_tree().as_object() else {
        return devices;
    };
    for (ap_mac, bands) in access_points {
        let Some(bands) = bands.as_object() else {
            continue;
        };
        for networks in bands.values() {
            let Some(networks) = networks.as_object() else {
                continue;
            };
            for clients in networks.values() {
                let Some(clients) = clients.as_object() else {
                    continue;
                };
                for (client_mac, info) in clients {
                    let mac = MacAddress::from(client_mac.as_str());
                    devices.insert(
                        mac.clone(),
                        WifiDevice {
                            mac,
                            connected_to: MacAddress::from(ap_mac.as_str()),
                            attrs: info.as_object().cloned().unwrap_or_default(),
                        },
                    );
                }
            }
        }
    }
    devices
}

/// The router's own ethernet ports, keyed by port id (`eth-0`, `eth-1`, ...).
pub fn extract_ethernet_ports(
    topology: &RawTopology,
    router_mac: Option<&MacAddress>,
) -> HashMap<String, EthernetPort> {
    let mut ports = HashMap::new();
    let Some(router_ports) = router_mac
        .and_then(|mac| topology.ethernet_ports().get(mac.as_str()))
        .and_then(Value::as_object)
    else {
        return ports;
    };
    for (port_id, info) in router_ports {
        ports.insert(
            port_id.clone(),
            EthernetPort {
                id: port_id.clone(),
                attrs: info.as_object().cloned().unwrap_or_default(),
            },
        );
    }
    ports
}

/// Wired clients: the port-assignment tree names who is plugged in where,
/// the device-info map contributes the attributes. A device missing from
/// the info map still appears, just with empty attributes.
pub fn extract_ethernet_devices(
    topology: &RawTopology,
    router_mac: Option<&MacAddress>,
) -> HashMap<MacAddress, EthernetDevice> {
    let mut devices = HashMap::new();
    let Some(assignments) = router_mac
        .and_then(|mac| topology.port_assignments().get(mac.as_str()))
        .and_then(Value::as_object)
    else {
        return devices;
    };
    let info_map = topology.device_info().as_object();
    for (device_mac, port) in assignments {
        let attrs = info_map
            .and_then(|m| m.get(device_mac))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let mac = MacAddress::from(device_mac.as_str());
        devices.insert(
            mac.clone(),
            EthernetDevice {
                mac,
                connected_to_port: port_label(port),
                attrs,
            },
        );
    }
    devices
}

/// Project WAN throughput from the `eth-0` bitrate fields.
///
/// Download is recomputed on every poll and falls back to 0 when the
/// field is missing or zero. Upload keeps its previous value unless a
/// non-zero sample arrives: a transiently dropped sample must not flash
/// an already-observed upload speed to zero. The asymmetry is deliberate,
/// long-observed behavior.
#[allow(clippy::float_cmp)] // the firmware sends integer bitrates; zero means "no sample"
pub fn extract_wan_speeds(
    topology: &RawTopology,
    router_mac: Option<&MacAddress>,
    previous: WanSpeeds,
) -> WanSpeeds {
    let wan_port = router_mac
        .and_then(|mac| topology.ethernet_ports().get(mac.as_str()))
        .and_then(|ports| ports.get(WAN_PORT));

    let download_mbps = wan_port
        .and_then(|port| port.get("rx_bitrate"))
        .and_then(Value::as_f64)
        .filter(|rate| *rate != 0.0)
        .map_or(0.0, |rate| rate / 1024.0);

    let upload_mbps = wan_port
        .and_then(|port| port.get("tx_bitrate"))
        .and_then(Value::as_f64)
        .filter(|rate| *rate != 0.0)
        .map_or(previous.upload_mbps, |rate| rate / 1024.0);

    WanSpeeds {
        download_mbps,
        upload_mbps,
    }
}

fn port_label(port: &Value) -> String {
    match port {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use serde_json::json;

    use super::*;

    fn topology(value: Value) -> RawTopology {
        RawTopology::from_value(value).unwrap()
    }

    // ── find_router_mac ─────────────────────────────────────────────

    #[test]
    fn router_found_at_depth() {
        let tree = json!({
            "children": {
                "level1": {
                    "level2": { "mac": "AA:BB", "role": "Router" }
                }
            }
        });
        assert_eq!(find_router_mac(&tree), Some(MacAddress::from("AA:BB")));
    }

    #[test]
    fn first_router_in_document_order_wins() {
        let tree = json!({
            "a": { "mac": "11:11", "role": "Router" },
            "b": { "mac": "22:22", "role": "Router" }
        });
        assert_eq!(find_router_mac(&tree), Some(MacAddress::from("11:11")));
    }

    #[test]
    fn role_without_mac_is_skipped() {
        let tree = json!({
            "a": { "role": "Router" },
            "b": { "mac": "22:22", "role": "Router" }
        });
        assert_eq!(find_router_mac(&tree), Some(MacAddress::from("22:22")));
    }

    #[test]
    fn no_router_role_means_absent() {
        let tree = json!({
            "a": { "mac": "11:11", "role": "MeshPoint" }
        });
        assert_eq!(find_router_mac(&tree), None);
    }

    #[test]
    fn router_inside_array_is_found() {
        let tree = json!([{ "nodes": [{ "mac": "AA:BB", "role": "Router" }] }]);
        assert_eq!(find_router_mac(&tree), Some(MacAddress::from("AA:BB")));
    }

    #[test]
    fn search_depth_is_bounded() {
        let mut tree = json!({ "mac": "AA:BB", "role": "Router" });
        for _ in 0..40 {
            tree = json!({ "child": tree });
        }
        assert_eq!(find_router_mac(&tree), None);
    }

    // ── extract_wifi_devices ────────────────────────────────────────

    #[test]
    fn wifi_tree_flattens_four_levels() {
        let topology = topology(json!([
            {},
            { "AP:01": { "2.4 GHz": { "User network": {
                "CC:DD": { "HostName": "phone" }
            }}}},
            {}, {}, {}
        ]));

        let devices = extract_wifi_devices(&topology);

        assert_eq!(devices.len(), 1);
        let device = &devices[&MacAddress::from("CC:DD")];
        assert_eq!(device.display_name(), "phone");
        assert_eq!(device.connected_to, MacAddress::from("AP:01"));
    }

    #[test]
    fn empty_wifi_tree_yields_empty_map() {
        let topology = topology(json!([{}, {}, {}, {}, {}]));
        assert!(extract_wifi_devices(&topology).is_empty());
    }

    #[test]
    fn wrong_shaped_wifi_tree_yields_empty_map() {
        let topology = topology(json!([{}, null, {}, {}, {}]));
        assert!(extract_wifi_devices(&topology).is_empty());
    }

    #[test]
    fn later_access_point_wins_on_collision() {
        let topology = topology(json!([
            {},
            {
                "AP:01": { "5 GHz": { "User network": {
                    "CC:DD": { "HostName": "first" }
                }}},
                "AP:02": { "5 GHz": { "User network": {
                    "CC:DD": { "HostName": "second" }
                }}}
            },
            {}, {}, {}
        ]));

        let devices = extract_wifi_devices(&topology);

        assert_eq!(devices.len(), 1);
        let device = &devices[&MacAddress::from("CC:DD")];
        assert_eq!(device.display_name(), "second");
        assert_eq!(device.connected_to, MacAddress::from("AP:02"));
    }

    // ── extract_ethernet_ports / devices ────────────────────────────

    #[test]
    fn ports_for_resolved_router() {
        let topology = topology(json!([
            {}, {}, {}, {},
            { "AA:BB": {
                "eth-0": { "link": true },
                "eth-1": { "link": false }
            }}
        ]));

        let router = MacAddress::from("AA:BB");
        let ports = extract_ethernet_ports(&topology, Some(&router));

        assert_eq!(ports.len(), 2);
        assert!(ports["eth-0"].is_link_up());
        assert!(!ports["eth-1"].is_link_up());
    }

    #[test]
    fn unresolved_router_yields_empty_ports() {
        let topology = topology(json!([
            {}, {}, {}, {},
            { "AA:BB": { "eth-0": { "link": true } } }
        ]));

        assert!(extract_ethernet_ports(&topology, None).is_empty());

        let stranger = MacAddress::from("99:99");
        assert!(extract_ethernet_ports(&topology, Some(&stranger)).is_empty());
    }

    #[test]
    fn ethernet_devices_join_assignments_with_info() {
        let topology = topology(json!([
            {},
            {},
            {
                "DE:AD": { "host_name": "nas", "ip": "192.168.178.5" }
            },
            { "AA:BB": { "DE:AD": "eth-2", "BE:EF": 3 } },
            {}
        ]));

        let router = MacAddress::from("AA:BB");
        let devices = extract_ethernet_devices(&topology, Some(&router));

        assert_eq!(devices.len(), 2);

        let nas = &devices[&MacAddress::from("DE:AD")];
        assert_eq!(nas.connected_to_port, "eth-2");
        assert_eq!(nas.display_name(), "nas");

        // No info-map entry: present anyway, numeric port stringified.
        let mystery = &devices[&MacAddress::from("BE:EF")];
        assert_eq!(mystery.connected_to_port, "3");
        assert_eq!(mystery.display_name(), "BE:EF");
    }

    // ── extract_wan_speeds ──────────────────────────────────────────

    fn wan_topology(port: Value) -> RawTopology {
        topology(json!([{}, {}, {}, {}, { "AA:BB": { "eth-0": port } }]))
    }

    #[test]
    fn download_recomputes_upload_retains_on_zero() {
        let topology = wan_topology(json!({ "rx_bitrate": 2048, "tx_bitrate": 0 }));
        let previous = WanSpeeds {
            download_mbps: 9.0,
            upload_mbps: 5.0,
        };

        let router = MacAddress::from("AA:BB");
        let speeds = extract_wan_speeds(&topology, Some(&router), previous);

        assert_eq!(speeds.download_mbps, 2.0);
        assert_eq!(speeds.upload_mbps, 5.0);
    }

    #[test]
    fn both_fields_present_and_nonzero() {
        let topology = wan_topology(json!({ "rx_bitrate": 10240, "tx_bitrate": 5120 }));

        let router = MacAddress::from("AA:BB");
        let speeds = extract_wan_speeds(&topology, Some(&router), WanSpeeds::default());

        assert_eq!(speeds.download_mbps, 10.0);
        assert_eq!(speeds.upload_mbps, 5.0);
    }

    #[test]
    fn missing_fields_zero_download_keep_upload() {
        let topology = wan_topology(json!({ "link": true }));
        let previous = WanSpeeds {
            download_mbps: 9.0,
            upload_mbps: 5.0,
        };

        let router = MacAddress::from("AA:BB");
        let speeds = extract_wan_speeds(&topology, Some(&router), previous);

        assert_eq!(speeds.download_mbps, 0.0);
        assert_eq!(speeds.upload_mbps, 5.0);
    }

    #[test]
    fn unresolved_router_yields_default_speeds() {
        let topology = wan_topology(json!({ "rx_bitrate": 2048, "tx_bitrate": 1024 }));

        let speeds = extract_wan_speeds(&topology, None, WanSpeeds::default());

        assert_eq!(speeds, WanSpeeds::default());
    }
}
