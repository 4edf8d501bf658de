//! Sync core between `heathub-api` and Heat Hub consumers (CLI, bindings).
//!
//! This crate keeps one shared, periodically refreshed view of the hub's
//! whole domain and routes every write through a write-then-refresh cycle:
//!
//! - **[`Hub`]**: Central facade. [`start()`](Hub::start) spawns the
//!   periodic refresh, [`refresh_now()`](Hub::refresh_now) runs one cycle
//!   inline, and the `set_*` operations send commands and force a refresh.
//!   [`Hub::oneshot()`](Hub::oneshot) suits single CLI invocations.
//!
//! - **[`SnapshotStore`]**: Single-slot store built on `arc-swap`. Readers
//!   hold an `Arc<Snapshot>` that never changes under them; a publish
//!   swaps the pointer.
//!
//! - **Lookups**: Pure queries on [`Snapshot`]: rooms by name, entities by
//!   id or serial number, the room containing a device.
//!
//! - **[`HubCommand`]**: Every mutating operation, planned into one or two
//!   PATCH requests against the current snapshot.
//!
//! - **[`ListenerRegistry`]**: Opaque handles signalled after each
//!   published snapshot.
//!
//! - **Connectivity** ([`connectivity`]): maps transport outcomes to the
//!   bridge's [`ConnectivityState`], published on a watch channel.

pub mod command;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod hub;
pub mod listener;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{HubCommand, Patch, SettlePolicy};
pub use config::HubConfig;
pub use connectivity::{BridgeStatus, ConnectivityState, TransportOutcome, classify};
pub use error::CoreError;
pub use hub::{Dispatch, Hub};
pub use listener::{ListenerHandle, ListenerRegistry, RefreshListener};
pub use store::{HUB_DEVICE_ID, Snapshot, SnapshotStore};

// Wire models, re-exported so consumers need only this crate.
pub use heathub_api::{
    BatteryLevel, Device, Domain, HeatingChannel, HotWater, PatchBody, Room, RoomStat, Schedule,
    SignalStrength, SmartPlug, SmartValve, Station, System,
};
