use thiserror::Error;

/// Top-level error type for the `ampliwatch-api` crate.
///
/// Covers every failure mode of the router conversation: the login
/// handshake, transport, and the topology data fetch. `ampliwatch-core`
/// maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Handshake failed (missing token in HTML, bad password, missing
    /// session cookie, non-200 on a handshake endpoint).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// Data endpoint returned non-200, an unparsable body, or a topology
    /// array shorter than the firmware contract.
    #[error("Data fetch failed: {message}")]
    DataFetch { message: String },
}

impl Error {
    /// Returns `true` if this error came from the handshake and a fresh
    /// set of credentials might resolve it.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll cycle without operator intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::DataFetch { .. } => true,
            _ => false,
        }
    }
}
