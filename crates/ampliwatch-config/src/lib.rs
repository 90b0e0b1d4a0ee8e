//! Configuration loading and profile management for ampliwatch.
//!
//! Configuration lives in a single TOML file under the platform config
//! directory, layered through figment: compiled defaults first, then the
//! file, then `AMPLIFI_*` environment variables. Each named profile
//! describes one router; passwords resolve from the environment or the
//! OS keyring before falling back to plaintext in the file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ampliwatch_core::RouterConfig;
use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyring service name under which router passwords are stored.
pub const KEYRING_SERVICE: &str = "ampliwatch";

/// Request timeout applied when neither the profile nor the caller sets one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Poll interval applied when neither the profile nor the caller sets one.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

// ── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Validation(String),

    #[error("no password found for profile {profile:?}; set AMPLIFI_PASSWORD, store one with `ampliwatch config set-password`, or add it to the profile")]
    NoCredentials { profile: String },

    #[error("could not serialize configuration: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("configuration error: {0}")]
    Figment(Box<figment::Error>),

    #[error("could not write configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config model ────────────────────────────────────────────────────────────

/// Root of the on-disk configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Profile used when no `--profile` flag or env override is given.
    pub default_profile: Option<String>,
    pub defaults: Defaults,
    pub profiles: HashMap<String, Profile>,
}

/// Global knobs that apply across profiles unless a profile overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Output format name: `table`, `json`, `json-compact`, `yaml`, `plain`.
    pub output: String,
    /// Color policy: `auto`, `always`, `never`.
    pub color: String,
    /// HTTP request timeout in seconds.
    pub timeout: u64,
    /// Seconds between polls in watch mode.
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: DEFAULT_TIMEOUT_SECS,
            poll_interval: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

/// One router the tool knows how to reach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Router host, with or without a scheme. Bare hosts get `http://`.
    pub host: String,
    /// Plaintext password. Least preferred; see [`resolve_password`].
    pub password: Option<String>,
    /// Name of an environment variable holding the password.
    pub password_env: Option<String>,
    /// Per-profile request timeout in seconds.
    pub timeout: Option<u64>,
    /// Per-profile poll interval in seconds.
    pub poll_interval: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            host: default_host(),
            password: None,
            password_env: None,
            timeout: None,
            poll_interval: None,
        }
    }
}

fn default_output() -> String {
    "table".to_owned()
}

fn default_color() -> String {
    "auto".to_owned()
}

fn default_host() -> String {
    "amplifi.lan".to_owned()
}

impl Config {
    /// Name of the profile a command should act on, in precedence order:
    /// explicit override, then `default_profile`, then `"default"`.
    pub fn active_profile_name(&self, override_name: Option<&str>) -> String {
        override_name
            .map(ToOwned::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".to_owned())
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}

// ── Paths ───────────────────────────────────────────────────────────────────

/// Platform path of the configuration file.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "ampliwatch", "ampliwatch")
        .map_or_else(dirs_fallback, |dirs| dirs.config_dir().join("config.toml"))
}

fn dirs_fallback() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_owned());
    PathBuf::from(home)
        .join(".config")
        .join("ampliwatch")
        .join("config.toml")
}

// ── Load & save ─────────────────────────────────────────────────────────────

/// Loads configuration from the default path, the environment layered on top.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Loads configuration from an explicit file path. A missing file is not an
/// error; the compiled defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AMPLIFI_").split("_"))
        .extract()?;
    Ok(config)
}

/// Loads configuration, falling back to compiled defaults if the file or the
/// environment is malformed.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Writes configuration to the default path, creating parent directories.
/// Returns the path written.
pub fn save_config(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(config, &path)?;
    Ok(path)
}

/// Writes configuration to an explicit file path.
pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(config)?;
    fs::write(path, rendered)?;
    Ok(())
}

// ── Credentials ─────────────────────────────────────────────────────────────

/// Keyring entry holding the password for one profile.
pub fn keyring_entry(profile_name: &str) -> keyring::Result<keyring::Entry> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

/// Resolves the router password for a profile, in precedence order:
///
/// 1. the variable named by `password_env`
/// 2. `AMPLIFI_PASSWORD`
/// 3. the OS keyring entry for this profile
/// 4. plaintext `password` in the file
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(var) = &profile.password_env {
        if let Ok(value) = std::env::var(var) {
            return Ok(SecretString::from(value));
        }
    }
    if let Ok(value) = std::env::var("AMPLIFI_PASSWORD") {
        return Ok(SecretString::from(value));
    }
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(value) = entry.get_password() {
            return Ok(SecretString::from(value));
        }
    }
    if let Some(value) = &profile.password {
        return Ok(SecretString::from(value.clone()));
    }
    Err(ConfigError::NoCredentials {
        profile: profile_name.to_owned(),
    })
}

// ── Conversion ──────────────────────────────────────────────────────────────

/// Builds the core [`RouterConfig`] for a profile, resolving the password.
pub fn profile_to_router_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<RouterConfig, ConfigError> {
    let password = resolve_password(profile, profile_name)?;
    Ok(RouterConfig {
        host: profile.host.clone(),
        password,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        poll_interval: Duration::from_secs(
            profile.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        ),
    })
}
