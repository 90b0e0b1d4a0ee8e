//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use ampliwatch_config::ConfigError;
use ampliwatch_core::CoreError;

/// Exit codes, stable for scripting.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to the router at {url}")]
    #[diagnostic(
        code(ampliwatch::connection_failed),
        help(
            "Check that the router is powered on and reachable on the LAN.\n\
             URL: {url}\n\
             Try: ampliwatch check -v"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Connection test failed for {url}")]
    #[diagnostic(
        code(ampliwatch::check_failed),
        help(
            "The router is unreachable or rejected the password.\n\
             Re-run with -v to see which handshake step failed."
        )
    )]
    CheckFailed { url: String },

    #[error("Router did not respond in time")]
    #[diagnostic(
        code(ampliwatch::timeout),
        help("Increase --timeout or check the connection to the router.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(ampliwatch::auth_failed),
        help(
            "Verify the router's admin password (the one the mobile app uses).\n\
             Run: ampliwatch config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(ampliwatch::no_credentials),
        help(
            "Configure one with: ampliwatch config init\n\
             Or set the AMPLIFI_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Data ─────────────────────────────────────────────────────────

    #[error("Router returned an unexpected response: {message}")]
    #[diagnostic(
        code(ampliwatch::fetch),
        help(
            "The router may be rebooting or mid-upgrade; retry shortly.\n\
             Use -vv to log the raw exchange."
        )
    )]
    Fetch { message: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(ampliwatch::not_found),
        help("Run: ampliwatch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ampliwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(ampliwatch::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: ampliwatch config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(ampliwatch::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::CheckFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },

            CoreError::Timeout => Self::Timeout,

            CoreError::FetchFailed { message } => Self::Fetch { message },

            CoreError::Config { message } => Self::Validation {
                field: "host".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            other => Self::Config(other),
        }
    }
}
