// ── Hub facade ──
//
// Lifecycle and command surface for one Heat Hub. Owns the HTTP client,
// the snapshot store, the listener registry, and the background refresh
// task. Every write goes out as one or two PATCH requests followed by a
// forced refresh, so consumers only ever see state the hub reported.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use heathub_api::{
    Device, HeatingChannel, HotWater, HubClient, PatchBody, Room, RoomStat, Schedule, SmartPlug,
    SmartValve, Station, System,
};

use crate::command::{HubCommand, SettlePolicy};
use crate::config::HubConfig;
use crate::connectivity::{BridgeStatus, TransportOutcome};
use crate::error::CoreError;
use crate::listener::{ListenerHandle, ListenerRegistry};
use crate::store::{Snapshot, SnapshotStore};

/// Result of handing a command to [`Hub::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The target is not in the current snapshot; nothing was sent.
    Unresolved,
    /// Requests were sent; one outcome per request, in order.
    Sent(Vec<TransportOutcome>),
}

// ── Hub ──────────────────────────────────────────────────────────

/// Entry point for consumers.
///
/// Cheaply cloneable via `Arc<HubInner>`. A freshly built hub can refresh
/// and accept commands straight away; [`start`](Self::start) only adds the
/// periodic refresh.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

struct HubInner {
    config: HubConfig,
    client: HubClient,
    store: SnapshotStore,
    listeners: ListenerRegistry,
    status: watch::Sender<Option<BridgeStatus>>,
    /// Serializes fetch → publish → notify.
    refresh_lock: Mutex<()>,
    cancel: CancellationToken,
    /// Child token for the current run. Cancelled by `stop`, replaced by `start`.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Hub {
    /// Build a hub from configuration. Does not contact the hub.
    pub fn new(config: HubConfig) -> Result<Self, CoreError> {
        let client = HubClient::new(&config.address, config.secret.clone(), &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Build a hub around an existing client.
    pub fn with_client(config: HubConfig, client: HubClient) -> Self {
        let (status, _) = watch::channel(None);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(HubInner {
                config,
                client,
                store: SnapshotStore::new(),
                listeners: ListenerRegistry::new(),
                status,
                refresh_lock: Mutex::new(()),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start the periodic refresh.
    ///
    /// The first cycle runs immediately. Calling `start` on a running hub
    /// restarts the cadence. A zero refresh interval starts nothing.
    pub async fn start(&self) {
        let child = self.inner.cancel.child_token();
        {
            let mut current = self.inner.cancel_child.lock().await;
            current.cancel();
            *current = child.clone();
        }

        let interval = self.inner.config.refresh_interval;
        if interval.is_zero() {
            info!("periodic refresh disabled");
            return;
        }

        info!(interval_secs = interval.as_secs(), "starting periodic refresh");
        let handle = tokio::spawn(refresh_task(self.clone(), interval, child));
        self.track(handle).await;
    }

    /// Stop all background work.
    ///
    /// Pending cycles are cancelled. Requests already in flight finish,
    /// but their results are discarded.
    pub async fn stop(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let handles: Vec<_> = self.inner.task_handles.lock().await.drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
        info!("hub stopped");
    }

    /// Run one refresh cycle now and wait for it.
    ///
    /// On success the new snapshot has been published and every listener
    /// notified. On failure the previous snapshot stays in place.
    pub async fn refresh_now(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _cycle = self.inner.refresh_lock.lock().await;
        // Taken under the lock so a restart while queued is honoured.
        let cancel = self.current_token().await;
        if cancel.is_cancelled() {
            return Err(CoreError::Stopped);
        }

        let requested_at = Utc::now();
        let result = self.inner.client.get_domain().await;
        if cancel.is_cancelled() {
            debug!("hub stopped during refresh, discarding result");
            return Err(CoreError::Stopped);
        }
        self.record_outcome(&result);

        let domain = match result {
            Ok(domain) => domain,
            Err(e) => {
                if e.is_parse_failure() {
                    warn!(error = %e, "hub returned a malformed domain, keeping previous snapshot");
                } else {
                    warn!(error = %e, "refresh failed");
                }
                return Err(e.into());
            }
        };

        let snapshot = self.inner.store.publish_at(domain, requested_at);
        let notified = self.inner.listeners.notify_all();
        debug!(
            version = snapshot.version(),
            rooms = snapshot.rooms().len(),
            notified,
            "snapshot published"
        );
        Ok(snapshot)
    }

    /// Run one refresh cycle in the background, outside the periodic cadence.
    pub async fn trigger_once(&self) {
        let hub = self.clone();
        let cancel = self.current_token().await;
        self.spawn_cycle(cancel, async move {
            if let Err(e) = hub.refresh_now().await {
                debug!(error = %e, "triggered refresh failed");
            }
        })
        .await;
    }

    /// Run one refresh cycle after `delay`, unless the hub is stopped first.
    pub async fn trigger_after(&self, delay: Duration) {
        let hub = self.clone();
        let cancel = self.current_token().await;
        let sleep_cancel = cancel.clone();
        self.spawn_cycle(cancel, async move {
            tokio::select! {
                biased;
                () = sleep_cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if let Err(e) = hub.refresh_now().await {
                        debug!(error = %e, "delayed refresh failed");
                    }
                }
            }
        })
        .await;
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: refresh once, run closure, stop.
    ///
    /// Meant for CLI use. The periodic refresh is never started, and the
    /// initial refresh must succeed for the closure to run.
    pub async fn oneshot<F, Fut, T, E>(config: HubConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(Hub) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<CoreError>,
    {
        let hub = Hub::new(config)?;
        hub.refresh_now().await?;
        let result = f(hub.clone()).await;
        hub.stop().await;
        result
    }

    // ── Listeners ────────────────────────────────────────────────

    /// Register for post-refresh signals. Returns whether it was newly added.
    pub fn register(&self, listener: &ListenerHandle) -> bool {
        self.inner.listeners.register(listener)
    }

    /// Returns whether `listener` was registered.
    pub fn unregister(&self, listener: &ListenerHandle) -> bool {
        self.inner.listeners.unregister(listener)
    }

    // ── Connectivity ─────────────────────────────────────────────

    /// Subscribe to connectivity changes. `None` until the first request ends.
    pub fn connectivity(&self) -> watch::Receiver<Option<BridgeStatus>> {
        self.inner.status.subscribe()
    }

    pub fn bridge_status(&self) -> Option<BridgeStatus> {
        self.inner.status.borrow().clone()
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Resolve, send, and settle a command.
    ///
    /// HTTP failures are not returned; they only show up as connectivity.
    pub async fn dispatch(&self, command: HubCommand) -> Dispatch {
        let snapshot = self.snapshot();
        let Some(patches) = command.plan(snapshot.as_deref(), self.inner.config.away_mode_set_point)
        else {
            debug!(?command, "command target not found, nothing sent");
            return Dispatch::Unresolved;
        };

        let mut outcomes = Vec::with_capacity(patches.len());
        for patch in &patches {
            outcomes.push(self.execute(&patch.path, &patch.body).await);
        }

        match command.settle_policy(self.inner.config.plug_settle_delay) {
            SettlePolicy::Immediate => {
                if let Err(e) = self.refresh_now().await {
                    debug!(error = %e, "post-command refresh failed");
                }
            }
            SettlePolicy::Delayed(delay) => self.trigger_after(delay).await,
        }

        Dispatch::Sent(outcomes)
    }

    /// Send one PATCH and classify how it ended.
    pub async fn execute(&self, path: &str, body: &PatchBody) -> TransportOutcome {
        debug!(path, %body, "sending command");
        let result = self.inner.client.patch(path, body).await;
        if let Err(ref e) = result {
            warn!(path, error = %e, "hub command failed");
        }
        self.record_outcome(&result)
    }

    pub async fn set_room_set_point(&self, room: &str, set_point: i32) {
        self.dispatch(HubCommand::SetRoomSetPoint {
            room: room.to_owned(),
            set_point,
        })
        .await;
    }

    pub async fn set_room_manual_mode(&self, room: &str, manual: bool) {
        self.dispatch(HubCommand::SetRoomManualMode {
            room: room.to_owned(),
            manual,
        })
        .await;
    }

    pub async fn set_room_window_detection(&self, room: &str, enabled: bool) {
        self.dispatch(HubCommand::SetRoomWindowDetection {
            room: room.to_owned(),
            enabled,
        })
        .await;
    }

    pub async fn set_room_boost(&self, room: &str, set_point: i32, duration_minutes: u32) {
        self.dispatch(HubCommand::BoostRoom {
            room: room.to_owned(),
            set_point,
            duration_minutes,
        })
        .await;
    }

    pub async fn cancel_room_boost(&self, room: &str) {
        self.dispatch(HubCommand::CancelRoomBoost {
            room: room.to_owned(),
        })
        .await;
    }

    /// Replace the room's schedule with `schedule`, sent verbatim.
    pub async fn set_room_schedule(&self, room: &str, schedule: &str) {
        self.dispatch(HubCommand::SetRoomSchedule {
            room: room.to_owned(),
            schedule: schedule.to_owned(),
        })
        .await;
    }

    pub async fn set_hot_water_manual_mode(&self, manual: bool) {
        self.dispatch(HubCommand::SetHotWaterManualMode { manual }).await;
    }

    pub async fn set_hot_water_set_point(&self, set_point: i32) {
        self.dispatch(HubCommand::SetHotWaterSetPoint { set_point }).await;
    }

    pub async fn set_hot_water_boost(&self, duration_minutes: u32) {
        self.dispatch(HubCommand::BoostHotWater { duration_minutes }).await;
    }

    pub async fn cancel_hot_water_boost(&self) {
        self.dispatch(HubCommand::CancelHotWaterBoost).await;
    }

    /// Toggle away mode using the configured away setpoint.
    pub async fn set_away_mode(&self, away: bool) {
        self.dispatch(HubCommand::SetAwayMode { away }).await;
    }

    pub async fn set_eco_mode(&self, enabled: bool) {
        self.dispatch(HubCommand::SetEcoMode { enabled }).await;
    }

    pub async fn set_device_locked(&self, device_id: u32, locked: bool) {
        self.dispatch(HubCommand::SetDeviceLock { device_id, locked }).await;
    }

    pub async fn set_smart_plug_schedule(&self, plug_id: u32, schedule: &str) {
        self.dispatch(HubCommand::SetSmartPlugSchedule {
            plug_id,
            schedule: schedule.to_owned(),
        })
        .await;
    }

    pub async fn set_smart_plug_manual_mode(&self, plug_id: u32, manual: bool) {
        self.dispatch(HubCommand::SetSmartPlugManualMode { plug_id, manual })
            .await;
    }

    /// Switch the plug relay. The follow-up refresh waits for the
    /// configured settle delay.
    pub async fn set_smart_plug_output(&self, plug_id: u32, on: bool) {
        self.dispatch(HubCommand::SetSmartPlugOutput { plug_id, on }).await;
    }

    pub async fn set_smart_plug_away_action(&self, plug_id: u32, turn_off: bool) {
        self.dispatch(HubCommand::SetSmartPlugAwayAction { plug_id, turn_off })
            .await;
    }

    // ── Ad-hoc queries ───────────────────────────────────────────

    /// Fetch the hub's identity record. Not cached.
    pub async fn station(&self) -> Result<Station, CoreError> {
        let result = self.inner.client.get_station().await;
        self.record_outcome(&result);
        Ok(result?)
    }

    // ── Snapshot accessors ───────────────────────────────────────

    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.store.read()
    }

    pub fn system(&self) -> Option<System> {
        self.snapshot()?.system().cloned()
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.snapshot().map(|s| s.rooms().to_vec()).unwrap_or_default()
    }

    pub fn room_stats(&self) -> Vec<RoomStat> {
        self.snapshot().map(|s| s.room_stats().to_vec()).unwrap_or_default()
    }

    pub fn smart_valves(&self) -> Vec<SmartValve> {
        self.snapshot().map(|s| s.smart_valves().to_vec()).unwrap_or_default()
    }

    pub fn smart_plugs(&self) -> Vec<SmartPlug> {
        self.snapshot().map(|s| s.smart_plugs().to_vec()).unwrap_or_default()
    }

    pub fn heating_channels(&self) -> Vec<HeatingChannel> {
        self.snapshot()
            .map(|s| s.heating_channels().to_vec())
            .unwrap_or_default()
    }

    pub fn hot_water(&self) -> Vec<HotWater> {
        self.snapshot().map(|s| s.hot_water().to_vec()).unwrap_or_default()
    }

    // ── Lookups (delegate to the current snapshot) ───────────────

    pub fn room(&self, name: &str) -> Option<Room> {
        self.snapshot()?.room(name).cloned()
    }

    pub fn room_stat(&self, id: u32) -> Option<RoomStat> {
        self.snapshot()?.room_stat(id).cloned()
    }

    pub fn room_stat_by_serial(&self, serial: &str) -> Option<RoomStat> {
        self.snapshot()?.room_stat_by_serial(serial).cloned()
    }

    pub fn smart_valve(&self, id: u32) -> Option<SmartValve> {
        self.snapshot()?.smart_valve(id).cloned()
    }

    pub fn smart_valve_by_serial(&self, serial: &str) -> Option<SmartValve> {
        self.snapshot()?.smart_valve_by_serial(serial).cloned()
    }

    pub fn smart_plug(&self, id: u32) -> Option<SmartPlug> {
        self.snapshot()?.smart_plug(id).cloned()
    }

    pub fn smart_plug_by_serial(&self, serial: &str) -> Option<SmartPlug> {
        self.snapshot()?.smart_plug_by_serial(serial).cloned()
    }

    pub fn device(&self, id: u32) -> Option<Device> {
        self.snapshot()?.device(id).cloned()
    }

    pub fn hub_device(&self) -> Option<Device> {
        self.snapshot()?.hub_device().cloned()
    }

    pub fn schedule(&self, id: u32) -> Option<Schedule> {
        self.snapshot()?.schedule(id).cloned()
    }

    pub fn room_for_device(&self, device_id: u32) -> Option<Room> {
        self.snapshot()?.room_for_device(device_id).cloned()
    }

    // ── Internals ────────────────────────────────────────────────

    async fn current_token(&self) -> CancellationToken {
        self.inner.cancel_child.lock().await.clone()
    }

    async fn track(&self, handle: JoinHandle<()>) {
        let mut handles = self.inner.task_handles.lock().await;
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    async fn spawn_cycle<F>(&self, cancel: CancellationToken, cycle: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if cancel.is_cancelled() {
            return;
        }
        self.track(tokio::spawn(cycle)).await;
    }

    /// Classify a finished request and publish the verdict if it changed.
    fn record_outcome<T>(&self, result: &Result<T, heathub_api::Error>) -> TransportOutcome {
        let outcome = TransportOutcome::of(result);
        let status = BridgeStatus::from_result(result);

        let changed = self.inner.status.send_if_modified(|current| {
            if current.as_ref() == Some(&status) {
                return false;
            }
            *current = Some(status.clone());
            true
        });

        if changed {
            if status.state.is_online() {
                info!("hub online");
            } else {
                warn!(
                    state = %status.state,
                    detail = status.detail.as_deref().unwrap_or_default(),
                    "hub offline"
                );
            }
        }
        outcome
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh the snapshot. The first tick fires immediately.
async fn refresh_task(hub: Hub, interval: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = hub.refresh_now().await {
                    debug!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
