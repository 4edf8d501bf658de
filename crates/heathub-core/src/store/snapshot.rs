use chrono::{DateTime, Utc};

use heathub_api::{
    Device, Domain, HeatingChannel, HotWater, Room, RoomStat, Schedule, SmartPlug, SmartValve,
    System,
};

/// One immutable, published copy of the hub's domain.
#[derive(Debug, Clone)]
pub struct Snapshot {
    domain: Domain,
    fetched_at: DateTime<Utc>,
    version: u64,
}

impl Snapshot {
    pub(crate) fn new(domain: Domain, fetched_at: DateTime<Utc>, version: u64) -> Self {
        Self {
            domain,
            fetched_at,
            version,
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// When the domain was fetched.
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Publish sequence number, starting at 1.
    pub fn version(&self) -> u64 {
        self.version
    }

    // ── Collection accessors ──

    pub fn system(&self) -> Option<&System> {
        self.domain.system.as_ref()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.domain.rooms
    }

    pub fn room_stats(&self) -> &[RoomStat] {
        &self.domain.room_stats
    }

    pub fn smart_valves(&self) -> &[SmartValve] {
        &self.domain.smart_valves
    }

    pub fn smart_plugs(&self) -> &[SmartPlug] {
        &self.domain.smart_plugs
    }

    pub fn devices(&self) -> &[Device] {
        &self.domain.devices
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.domain.schedules
    }

    pub fn heating_channels(&self) -> &[HeatingChannel] {
        &self.domain.heating_channels
    }

    pub fn hot_water(&self) -> &[HotWater] {
        &self.domain.hot_water
    }
}
