// ── Runtime hub configuration ──
//
// These types describe *how* to talk to one hub. They carry the shared
// secret and tuning knobs, but never touch disk. `heathub-config` (or any
// embedding host) constructs a `HubConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;

use heathub_api::TransportConfig;
use heathub_api::transport::{DEFAULT_MAX_CONNECTIONS, DEFAULT_TIMEOUT};

/// Default period between scheduled refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Default away-mode heating setpoint, whole °C.
pub const DEFAULT_AWAY_MODE_SET_POINT: i32 = 10;

/// How long to wait before re-reading a plug after switching its relay.
pub const DEFAULT_PLUG_SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Configuration for one hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Host (optionally `host:port`) or full base URL of the hub.
    pub address: String,
    /// Value of the `SECRET` request header.
    pub secret: SecretString,
    /// Period of the background refresh. Zero disables it.
    pub refresh_interval: Duration,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Requests allowed in flight at once.
    pub max_connections: usize,
    /// Heating setpoint applied while away mode is on, whole °C.
    pub away_mode_set_point: i32,
    /// Settle delay before the forced refresh after a plug output change.
    pub plug_settle_delay: Duration,
}

impl HubConfig {
    /// Config for `address` with every tuning knob at its default.
    pub fn new(address: impl Into<String>, secret: SecretString) -> Self {
        Self {
            address: address.into(),
            secret,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            away_mode_set_point: DEFAULT_AWAY_MODE_SET_POINT,
            plug_settle_delay: DEFAULT_PLUG_SETTLE_DELAY,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_max_connections(self.max_connections)
    }
}
