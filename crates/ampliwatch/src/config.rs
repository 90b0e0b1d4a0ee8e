//! CLI configuration -- thin wrapper around `ampliwatch_config` shared types.
//!
//! Re-exports the shared types and adds the resolution step that layers
//! `GlobalOpts` flag overrides (--host, --password, --timeout) on top of
//! the selected profile.

use std::time::Duration;

use secrecy::SecretString;

use ampliwatch_core::RouterConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ampliwatch_config::{
    Config, Profile, config_path, load_config_or_default, resolve_password, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Render the available profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".to_owned()
    } else {
        names.join(", ")
    }
}

/// Translate the selected profile plus global flag overrides into a
/// core [`RouterConfig`].
///
/// Selecting a missing profile by name is an error; falling through to
/// the implicit `default` profile is not, so a bare
/// `AMPLIFI_PASSWORD=... ampliwatch status` works with zero config.
pub fn resolve_router_config(global: &GlobalOpts) -> Result<RouterConfig, CliError> {
    let config = load_config_or_default();
    let profile_name = active_profile_name(global, &config);

    let profile = if let Some(profile) = config.profile(&profile_name) {
        profile.clone()
    } else if global.profile.is_some() || config.default_profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&config),
        });
    } else {
        Profile::default()
    };

    // Host: flag (or AMPLIFI_HOST) beats the profile.
    let host = global
        .host
        .clone()
        .unwrap_or_else(|| profile.host.clone());

    // Password: flag (or AMPLIFI_PASSWORD) beats the shared chain.
    let password = if let Some(pw) = &global.password {
        SecretString::from(pw.clone())
    } else {
        resolve_password(&profile, &profile_name)?
    };

    // Timeout: flag, then profile, then global defaults.
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    let poll_interval = profile
        .poll_interval
        .unwrap_or(config.defaults.poll_interval);

    Ok(RouterConfig {
        host,
        password,
        timeout: Duration::from_secs(timeout),
        poll_interval: Duration::from_secs(poll_interval),
    })
}
