// heathub-api: Async Rust client for the Heat Hub local control API

pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{HubClient, PatchBody, SECRET_HEADER};
pub use error::Error;
pub use models::{
    BatteryLevel, Device, Domain, HeatingChannel, HotWater, Reception, Room, RoomStat, Schedule,
    SignalStrength, SmartPlug, SmartValve, Station, System,
};
pub use transport::TransportConfig;
