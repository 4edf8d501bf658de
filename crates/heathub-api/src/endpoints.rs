// Hub endpoint paths and read endpoints
//
// Path builders for every resource the hub exposes, plus the two GET
// endpoints. Writes go through `HubClient::patch` with these paths.

use tracing::debug;

use crate::client::HubClient;
use crate::error::Error;
use crate::models::{Domain, Station};

/// Full domain snapshot.
pub const DOMAIN: &str = "domain";
/// Hub identity.
pub const STATION: &str = "station";
/// System-wide settings (eco mode).
pub const SYSTEM: &str = "system";
/// System-wide override (away mode).
pub const SYSTEM_OVERRIDE: &str = "system/RequestOverride";
/// The hub exposes a single hot-water zone with this fixed id.
pub const HOT_WATER_ID: u32 = 2;

/// `rooms/{id}`
pub fn room(id: u32) -> String {
    format!("rooms/{id}")
}

/// `rooms/{id}/WindowDetectionActive`
pub fn room_window_detection(id: u32) -> String {
    format!("rooms/{id}/WindowDetectionActive")
}

/// `hotwater/2`
pub fn hot_water() -> String {
    format!("hotwater/{HOT_WATER_ID}")
}

/// `hotwater/2/RequestOverride`
pub fn hot_water_override() -> String {
    format!("hotwater/{HOT_WATER_ID}/RequestOverride")
}

/// `devices/{id}/DeviceLockEnabled`
pub fn device_lock(id: u32) -> String {
    format!("devices/{id}/DeviceLockEnabled")
}

/// `smartplug/{id}`
pub fn smart_plug(id: u32) -> String {
    format!("smartplug/{id}")
}

/// `schedules/{id}`
pub fn schedule(id: u32) -> String {
    format!("schedules/{id}")
}

impl HubClient {
    /// Fetch the complete domain state.
    ///
    /// `GET /domain`
    pub async fn get_domain(&self) -> Result<Domain, Error> {
        debug!("fetching domain");
        self.get_json(DOMAIN).await
    }

    /// Fetch the hub's identity record.
    ///
    /// `GET /station`
    pub async fn get_station(&self) -> Result<Station, Error> {
        debug!("fetching station");
        self.get_json(STATION).await
    }
}
