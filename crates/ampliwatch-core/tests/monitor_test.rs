#![allow(clippy::unwrap_used, clippy::float_cmp)]
// Integration tests for `RouterMonitor` against a mocked router.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ampliwatch_core::{CoreError, MacAddress, RouterConfig, RouterMonitor};

const LOGIN_PAGE: &str =
    "<form method='post'><input type='hidden' name='token' value='AAAABBBBCCCCDDDD'></form>";
const INFO_PAGE: &str = "<script>var token='EEEEFFFFGGGGHHHH';</script>";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RouterMonitor) {
    let server = MockServer::start().await;
    let config = RouterConfig {
        host: server.uri(),
        password: "hunter2".to_string().into(),
        ..RouterConfig::default()
    };
    let monitor = RouterMonitor::new(&config).unwrap();
    (server, monitor)
}

async fn mount_handshake(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login.php"))
        .and(body_string_contains("password=hunter2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "webui-session=abc123; Path=/")
                .set_body_string("ok"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/info.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INFO_PAGE))
        .mount(server)
        .await;
}

async fn mount_topology_once(server: &MockServer, body: &Value) {
    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

fn full_topology() -> Value {
    json!([
        { "mac": "AA:BB", "role": "Router", "children": {} },
        { "AA:BB": { "2.4 GHz": { "User network": {
            "CC:DD": { "HostName": "phone", "Address": "192.168.178.20" }
        }}}},
        { "DE:AD": { "host_name": "nas" } },
        { "AA:BB": { "DE:AD": "eth-2" } },
        { "AA:BB": {
            "eth-0": { "link": true, "rx_bitrate": 10240, "tx_bitrate": 5120 },
            "eth-1": { "link": false }
        }}
    ])
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_projects_all_views() {
    let (server, monitor) = setup().await;
    mount_handshake(&server).await;
    mount_topology_once(&server, &full_topology()).await;

    let snapshot = monitor.refresh().await.unwrap();

    assert_eq!(monitor.router_mac(), Some(MacAddress::from("AA:BB")));

    assert_eq!(snapshot.wifi_devices.len(), 1);
    let phone = &snapshot.wifi_devices[&MacAddress::from("CC:DD")];
    assert_eq!(phone.display_name(), "phone");
    assert_eq!(phone.connected_to, MacAddress::from("AA:BB"));

    assert_eq!(snapshot.ethernet_devices.len(), 1);
    let nas = &snapshot.ethernet_devices[&MacAddress::from("DE:AD")];
    assert_eq!(nas.connected_to_port, "eth-2");
    assert_eq!(nas.display_name(), "nas");

    assert_eq!(snapshot.ethernet_ports.len(), 2);
    assert!(snapshot.ethernet_ports["eth-0"].is_link_up());

    assert_eq!(snapshot.wan_speeds.download_mbps, 10.0);
    assert_eq!(snapshot.wan_speeds.upload_mbps, 5.0);
    assert!(snapshot.last_updated.is_some());
}

#[tokio::test]
async fn failed_poll_retains_previous_snapshot() {
    let (server, monitor) = setup().await;
    mount_handshake(&server).await;
    mount_topology_once(&server, &full_topology()).await;

    monitor.refresh().await.unwrap();
    let before = monitor.last_updated();

    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = monitor.refresh().await;
    assert!(matches!(result, Err(CoreError::FetchFailed { .. })));

    // Consumers keep reading the last good data.
    assert_eq!(monitor.wifi_devices().len(), 1);
    assert_eq!(monitor.wan_speeds().download_mbps, 10.0);
    assert_eq!(monitor.last_updated(), before);
}

#[tokio::test]
async fn upload_speed_survives_a_dropped_sample() {
    let (server, monitor) = setup().await;
    mount_handshake(&server).await;
    mount_topology_once(&server, &full_topology()).await;

    let second = json!([
        { "mac": "AA:BB", "role": "Router" },
        {}, {}, {},
        { "AA:BB": { "eth-0": { "rx_bitrate": 2048, "tx_bitrate": 0 } } }
    ]);
    mount_topology_once(&server, &second).await;

    let first = monitor.refresh().await.unwrap();
    assert_eq!(first.wan_speeds.upload_mbps, 5.0);

    let snapshot = monitor.refresh().await.unwrap();
    assert_eq!(snapshot.wan_speeds.download_mbps, 2.0);
    assert_eq!(snapshot.wan_speeds.upload_mbps, 5.0);
}

#[tokio::test]
async fn router_identity_is_cached_between_polls() {
    let (server, monitor) = setup().await;
    mount_handshake(&server).await;
    mount_topology_once(&server, &full_topology()).await;

    // Second response has no Router role marker at all.
    let second = json!([
        { "mac": "AA:BB" },
        {}, {}, {},
        { "AA:BB": { "eth-0": { "link": true } } }
    ]);
    mount_topology_once(&server, &second).await;

    monitor.refresh().await.unwrap();
    let snapshot = monitor.refresh().await.unwrap();

    // Ports still resolve through the cached identity.
    assert_eq!(snapshot.ethernet_ports.len(), 1);
    assert_eq!(monitor.router_mac(), Some(MacAddress::from("AA:BB")));
}

#[tokio::test]
async fn wrong_password_maps_to_auth_error() {
    let (server, monitor) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;

    // No session cookie in the login response.
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;

    let result = monitor.refresh().await;
    assert!(matches!(result, Err(CoreError::AuthenticationFailed { .. })));

    assert!(!monitor.test_connection().await);
}
