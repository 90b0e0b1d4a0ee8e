// ── Core error types ──
//
// User-facing errors from ampliwatch-core. These are NOT API-specific --
// consumers never see HTTP status codes or scraping details directly.
// The `From<ampliwatch_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to router at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Router connection timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Topology fetch failed: {message}")]
    FetchFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ampliwatch_api::Error> for CoreError {
    fn from(err: ampliwatch_api::Error) -> Self {
        match err {
            ampliwatch_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            ampliwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::FetchFailed {
                        message: e.to_string(),
                    }
                }
            }
            ampliwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ampliwatch_api::Error::DataFetch { message } => CoreError::FetchFailed { message },
        }
    }
}
