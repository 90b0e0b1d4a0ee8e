// Session HTTP client for the AmpliFi web UI
//
// The router exposes no documented API. Everything goes through the same
// PHP pages the browser uses: a cookie-based session plus two short-lived
// tokens scraped out of HTML. This module owns the session state and the
// data fetch; the handshake steps live in `auth.rs` as inherent methods on
// the same type.

use std::sync::{Arc, RwLock};

use reqwest::cookie::Jar;
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::RawTopology;
use crate::transport::TransportConfig;

/// Login page. GET scrapes the login token, POST submits it with the password.
pub(crate) const LOGIN_PATH: &str = "/login.php";
/// Info page whose HTML embeds the data-fetch token.
pub(crate) const INFO_PATH: &str = "/info.php";
/// Data endpoint answering with the raw topology array.
pub(crate) const INFO_ASYNC_PATH: &str = "/info-async.php";
/// Cookie the router sets once the login POST is accepted.
pub(crate) const SESSION_COOKIE: &str = "webui-session";

/// Tokens scraped during one handshake. Set together on success, cleared
/// together on any failure; never persisted across process restarts.
#[derive(Debug, Clone)]
pub(crate) struct SessionTokens {
    #[allow(dead_code)]
    pub login_token: String,
    pub info_token: String,
}

/// HTTP client for one AmpliFi router.
///
/// Holds the session cookie jar and the scraped tokens. Safe to share
/// behind an `Arc`, but callers are expected to serialize polls per
/// router: one fetch at a time, no overlapping handshakes.
pub struct RouterClient {
    http: reqwest::Client,
    base_url: Url,
    password: SecretString,
    /// Jar shared with `http` so the handshake's session cookie is visible
    /// here for the explicit expiry in `reset_session`.
    cookie_jar: Arc<Jar>,
    tokens: RwLock<Option<SessionTokens>>,
}

impl RouterClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (the login flow requires cookies). The `base_url`
    /// should be the router root, e.g. `http://amplifi.lan`.
    pub fn new(
        base_url: Url,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let cookie_jar = match transport.cookie_jar {
            Some(ref jar) => Arc::clone(jar),
            None => Arc::new(Jar::default()),
        };
        let config = TransportConfig {
            cookie_jar: Some(Arc::clone(&cookie_jar)),
            ..transport.clone()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            password,
            cookie_jar,
            tokens: RwLock::new(None),
        })
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for the handshake steps in `auth.rs`).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// Build a full URL for one of the fixed router endpoints.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Session state ────────────────────────────────────────────────

    /// Whether a completed handshake's tokens are currently cached.
    pub fn has_session(&self) -> bool {
        self.tokens.read().expect("token lock poisoned").is_some()
    }

    pub(crate) fn set_tokens(&self, tokens: SessionTokens) {
        debug!("storing session tokens");
        *self.tokens.write().expect("token lock poisoned") = Some(tokens);
    }

    pub(crate) fn clear_tokens(&self) {
        *self.tokens.write().expect("token lock poisoned") = None;
    }

    fn info_token(&self) -> Option<String> {
        self.tokens
            .read()
            .expect("token lock poisoned")
            .as_ref()
            .map(|t| t.info_token.clone())
    }

    /// Drop all session state: both tokens and the session cookie.
    ///
    /// `reqwest`'s jar has no clear operation, so the cookie is overwritten
    /// with an already-expired one instead.
    pub(crate) fn reset_session(&self) {
        debug!("resetting session state");
        self.clear_tokens();
        self.cookie_jar
            .add_cookie_str(&format!("{SESSION_COOKIE}=; Max-Age=0"), &self.base_url);
    }

    // ── Data fetch ───────────────────────────────────────────────────

    /// Fetch one topology snapshot, performing the login handshake first
    /// if no session is cached.
    ///
    /// Any failure is surfaced as "this poll failed"; there is no retry
    /// loop in here. A non-200 status or an unparsable body also resets
    /// the session, so the next poll re-handshakes instead of looping on
    /// a dead session.
    pub async fn fetch_devices(&self) -> Result<RawTopology, Error> {
        self.ensure_authenticated(false).await?;

        let token = self.info_token().ok_or_else(|| Error::Authentication {
            message: "no info token after handshake".into(),
        })?;
        let url = self.endpoint(INFO_ASYNC_PATH)?;

        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .form(&[("do", "full"), ("token", token.as_str())])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            self.reset_session();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::DataFetch {
                message: format!("HTTP {status}: {}", preview(&body)),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        self.parse_topology(&body)
    }

    /// Parse the data-endpoint body into a validated topology.
    ///
    /// An expired session produces an HTML login page with HTTP 200 here,
    /// so a parse failure is treated as "session silently expired" and
    /// resets the session state.
    fn parse_topology(&self, body: &str) -> Result<RawTopology, Error> {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                self.reset_session();
                return Err(Error::DataFetch {
                    message: format!(
                        "unparsable topology body: {e} (body preview: {:?})",
                        preview(body)
                    ),
                });
            }
        };

        match RawTopology::from_value(value) {
            Ok(topology) => Ok(topology),
            Err(e) => {
                self.reset_session();
                Err(e)
            }
        }
    }
}

/// First 200 characters of a body, for error messages. Char-based so a
/// multi-byte response can't panic the slice.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
