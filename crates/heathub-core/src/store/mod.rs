// ── Snapshot store ──
//
// Holds the latest published domain snapshot. Readers get an `Arc` to an
// immutable snapshot and never block; publishing swaps the pointer in one
// step, so nobody observes a half-updated domain.

mod lookup;
mod snapshot;

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};

use heathub_api::Domain;

pub use lookup::HUB_DEVICE_ID;
pub use snapshot::Snapshot;

/// Single-slot, lock-free-read store for the current snapshot.
#[derive(Default)]
pub struct SnapshotStore {
    current: ArcSwapOption<Snapshot>,
    publish_lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published snapshot, if any.
    pub fn read(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    /// Publish `domain` as the new current snapshot, fetched just now.
    pub fn publish(&self, domain: Domain) -> Arc<Snapshot> {
        self.publish_at(domain, Utc::now())
    }

    /// Publish `domain` as fetched by a request issued at `fetched_at`.
    ///
    /// The snapshot is stamped with the next version and a fetch time no
    /// earlier than its predecessor's.
    pub fn publish_at(&self, domain: Domain, fetched_at: DateTime<Utc>) -> Arc<Snapshot> {
        let _guard = self
            .publish_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let previous = self.current.load();
        let (version, fetched_at) = match previous.as_deref() {
            Some(prev) => (prev.version() + 1, fetched_at.max(prev.fetched_at())),
            None => (1, fetched_at),
        };

        let snapshot = Arc::new(Snapshot::new(domain, fetched_at, version));
        self.current.store(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// Age of the current snapshot, if one exists.
    pub fn age(&self) -> Option<chrono::Duration> {
        self.read().map(|s| Utc::now() - s.fetched_at())
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("version", &self.read().map(|s| s.version()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn starts_empty() {
        let store = SnapshotStore::new();
        assert!(store.read().is_none());
        assert!(store.age().is_none());
    }

    #[test]
    fn versions_strictly_increase() {
        let store = SnapshotStore::new();
        let first = store.publish(Domain::default());
        let second = store.publish(Domain::default());

        assert_eq!(first.version(), 1);
        assert_eq!(second.version(), 2);
        assert_eq!(store.read().unwrap().version(), 2);
    }

    #[test]
    fn fetch_time_never_moves_backwards() {
        let store = SnapshotStore::new();
        let now = Utc::now();
        let first = store.publish_at(Domain::default(), now);
        let second = store.publish_at(Domain::default(), now - TimeDelta::seconds(30));

        assert_eq!(second.fetched_at(), first.fetched_at());
        assert!(second.version() > first.version());
    }

    #[test]
    fn readers_keep_their_snapshot_after_publish() {
        let store = SnapshotStore::new();
        let held = store.publish(Domain::default());
        store.publish(Domain::default());

        assert_eq!(held.version(), 1);
        assert_eq!(store.read().unwrap().version(), 2);
    }
}
