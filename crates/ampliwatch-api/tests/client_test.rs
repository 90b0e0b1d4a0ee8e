#![allow(clippy::unwrap_used)]
// Integration tests for `RouterClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ampliwatch_api::{Error, RouterClient, TransportConfig};

const LOGIN_TOKEN: &str = "AAAABBBBCCCCDDDD";
const INFO_TOKEN: &str = "EEEEFFFFGGGGHHHH";

const LOGIN_PAGE: &str =
    "<form method='post'><input type='hidden' name='token' value='AAAABBBBCCCCDDDD'></form>";
const INFO_PAGE: &str = "<script>var token='EEEEFFFFGGGGHHHH';</script>";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RouterClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let password: secrecy::SecretString = "hunter2".to_string().into();
    let client = RouterClient::new(base_url, password, &TransportConfig::default()).unwrap();
    (server, client)
}

fn topology_body() -> serde_json::Value {
    json!([
        { "mac": "AA:BB", "role": "Router", "children": {} },
        { "AA:BB": { "2.4 GHz": { "User network": {
            "CC:DD": { "HostName": "phone" }
        }}}},
        {},
        {},
        { "AA:BB": { "eth-0": { "rx_bitrate": 10240, "tx_bitrate": 5120 } } }
    ])
}

/// Mount the three handshake endpoints, each expected `times` times.
async fn mount_handshake(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .expect(times)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login.php"))
        .and(body_string_contains(format!("token={LOGIN_TOKEN}")))
        .and(body_string_contains("password=hunter2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "webui-session=abc123; Path=/")
                .set_body_string("ok"),
        )
        .expect(times)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/info.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(INFO_PAGE))
        .expect(times)
        .mount(server)
        .await;
}

// ── Handshake tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_handshake_and_fetch() {
    let (server, client) = setup().await;
    mount_handshake(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .and(body_string_contains("do=full"))
        .and(body_string_contains(format!("token={INFO_TOKEN}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(topology_body()))
        .expect(1)
        .mount(&server)
        .await;

    let topology = client.fetch_devices().await.unwrap();

    assert!(client.has_session());
    assert_eq!(
        topology.device_tree().get("role").and_then(|v| v.as_str()),
        Some("Router")
    );
    assert!(topology.ethernet_ports().get("AA:BB").is_some());
}

#[tokio::test]
async fn test_cached_session_skips_handshake() {
    let (server, client) = setup().await;
    mount_handshake(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(topology_body()))
        .expect(2)
        .mount(&server)
        .await;

    client.fetch_devices().await.unwrap();
    client.fetch_devices().await.unwrap();
}

#[tokio::test]
async fn test_login_page_without_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nothing here</html>"))
        .mount(&server)
        .await;

    let result = client.fetch_devices().await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("login token"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_login_without_session_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;

    // Wrong password: the router answers 200 with the login page again,
    // but never sets the session cookie.
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;

    let result = client.fetch_devices().await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("session cookie"), "got: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!client.has_session());
}

// ── Data fetch tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_data_endpoint_error_forces_rehandshake() {
    let (server, client) = setup().await;
    mount_handshake(&server, 2).await;

    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(topology_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.fetch_devices().await;
    match result {
        Err(Error::DataFetch { ref message }) => {
            assert!(message.contains("HTTP 500"), "got: {message}");
        }
        other => panic!("expected DataFetch error, got: {other:?}"),
    }
    assert!(!client.has_session());

    // The second poll starts from a clean slate and succeeds.
    client.fetch_devices().await.unwrap();
}

#[tokio::test]
async fn test_unparsable_body_clears_tokens() {
    let (server, client) = setup().await;
    mount_handshake(&server, 2).await;

    // Session silently expired: the data endpoint answers 200 with the
    // login page instead of JSON.
    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(topology_body()))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.fetch_devices().await;
    match result {
        Err(Error::DataFetch { ref message }) => {
            assert!(message.contains("unparsable"), "got: {message}");
        }
        other => panic!("expected DataFetch error, got: {other:?}"),
    }
    assert!(!client.has_session());

    client.fetch_devices().await.unwrap();
}

#[tokio::test]
async fn test_short_topology_array() {
    let (server, client) = setup().await;
    mount_handshake(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/info-async.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{}, {}])))
        .mount(&server)
        .await;

    let result = client.fetch_devices().await;

    match result {
        Err(Error::DataFetch { ref message }) => {
            assert!(message.contains("2 entries"), "got: {message}");
        }
        other => panic!("expected DataFetch error, got: {other:?}"),
    }
    assert!(!client.has_session());
}

// ── Connection test ─────────────────────────────────────────────────

#[tokio::test]
async fn test_connection_ok() {
    let (server, client) = setup().await;
    mount_handshake(&server, 1).await;

    assert!(client.test_connection().await);
    assert!(client.has_session());
}

#[tokio::test]
async fn test_connection_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login.php"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!client.test_connection().await);
    assert!(!client.has_session());
}
