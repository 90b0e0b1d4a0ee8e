// ── Runtime connection configuration ──
//
// Describes *how* to reach one AmpliFi router. Carries credential data
// and connection tuning, but never touches disk — the CLI constructs a
// `RouterConfig` from its config file and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;

/// Configuration for connecting to a single router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router host. A bare name or address (`amplifi.lan`, `192.168.178.1`)
    /// is served over plain HTTP; a full URL is used as given.
    pub host: String,
    /// The web UI admin password. AmpliFi has no user accounts, just the
    /// one password.
    pub password: SecretString,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How often a watch loop should poll.
    pub poll_interval: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: "amplifi.lan".into(),
            password: SecretString::from(String::new()),
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(10),
        }
    }
}

impl RouterConfig {
    /// The router root URL derived from `host`.
    pub fn base_url(&self) -> Result<Url, CoreError> {
        let raw = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        };
        Url::parse(&raw).map_err(|e| CoreError::Config {
            message: format!("invalid router host {:?}: {e}", self.host),
        })
    }
}
