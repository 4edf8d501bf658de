//! Shared configuration for Heat Hub tools.
//!
//! TOML profiles, secret resolution (env + plaintext), and translation to
//! `heathub_core::HubConfig`. The CLI layers its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use heathub_core::HubConfig;
use heathub_core::config::{
    DEFAULT_AWAY_MODE_SET_POINT, DEFAULT_PLUG_SETTLE_DELAY, DEFAULT_REFRESH_INTERVAL,
};

/// Environment variable consulted for the shared secret when the profile
/// names none of its own.
pub const SECRET_ENV: &str = "HEATHUB_SECRET";

/// Prefix for environment overrides, e.g. `HEATHUB_DEFAULTS__TIMEOUT=5`.
pub const ENV_PREFIX: &str = "HEATHUB_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("no secret configured for profile '{profile}'")]
    NoSecret { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named hub profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds between background refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Requests allowed in flight at once.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Away-mode heating setpoint, whole °C.
    #[serde(default = "default_away_mode_set_point")]
    pub away_mode_set_point: i32,

    /// Seconds to wait before re-reading a plug after switching it.
    #[serde(default = "default_plug_settle_delay")]
    pub plug_settle_delay: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
            max_connections: default_max_connections(),
            away_mode_set_point: default_away_mode_set_point(),
            plug_settle_delay: default_plug_settle_delay(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}
fn default_max_connections() -> usize {
    3
}
fn default_away_mode_set_point() -> i32 {
    DEFAULT_AWAY_MODE_SET_POINT
}
fn default_plug_settle_delay() -> u64 {
    DEFAULT_PLUG_SETTLE_DELAY.as_secs()
}

/// A named hub profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Hub host, `host:port`, or base URL (e.g., "192.168.1.20").
    pub address: String,

    /// Shared secret (plaintext; prefer `secret_env`).
    pub secret: Option<String>,

    /// Environment variable name containing the shared secret.
    pub secret_env: Option<String>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override refresh interval.
    pub refresh_interval: Option<u64>,

    /// Override away-mode setpoint.
    pub away_mode_set_point: Option<i32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "heathub", "heathub").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("heathub");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

// ── Secret resolution ───────────────────────────────────────────────

/// Resolve the shared secret from the environment and the profile.
pub fn resolve_secret(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_secret_with(profile, profile_name, |name| std::env::var(name).ok())
}

/// Resolve the shared secret using `lookup` for environment variables.
///
/// Order: the profile's `secret_env`, then `HEATHUB_SECRET`, then the
/// profile's plaintext `secret`.
pub fn resolve_secret_with(
    profile: &Profile,
    profile_name: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's secret_env → env var lookup
    if let Some(value) = profile.secret_env.as_deref().and_then(&lookup) {
        return Ok(SecretString::from(value));
    }

    // 2. Well-known env var
    if let Some(value) = lookup(SECRET_ENV) {
        return Ok(SecretString::from(value));
    }

    // 3. Plaintext in config
    if let Some(ref secret) = profile.secret {
        return Ok(SecretString::from(secret.clone()));
    }

    Err(ConfigError::NoSecret {
        profile: profile_name.into(),
    })
}

// ── Translation to HubConfig ────────────────────────────────────────

/// Build a `HubConfig` from a profile plus global defaults.
pub fn profile_to_hub_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<HubConfig, ConfigError> {
    let secret = resolve_secret(profile, profile_name)?;
    build_hub_config(profile, defaults, secret)
}

fn build_hub_config(
    profile: &Profile,
    defaults: &Defaults,
    secret: SecretString,
) -> Result<HubConfig, ConfigError> {
    let address = profile.address.trim();
    if address.is_empty() {
        return Err(ConfigError::Validation {
            field: "address".into(),
            reason: "hub address is empty".into(),
        });
    }
    if defaults.max_connections == 0 {
        return Err(ConfigError::Validation {
            field: "max_connections".into(),
            reason: "must be at least 1".into(),
        });
    }

    let mut config = HubConfig::new(address, secret);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_interval =
        Duration::from_secs(profile.refresh_interval.unwrap_or(defaults.refresh_interval));
    config.away_mode_set_point = profile
        .away_mode_set_point
        .unwrap_or(defaults.away_mode_set_point);
    config.max_connections = defaults.max_connections;
    config.plug_settle_delay = Duration::from_secs(defaults.plug_settle_delay);
    Ok(config)
}
