// ── Refresh listeners ──
//
// Consumers register an opaque handle and receive a zero-argument
// "refreshed" signal after every published snapshot. Identity is the
// handle's allocation: registering the same `Arc` twice is a no-op,
// while two separately allocated listeners are always distinct.

use std::sync::{Arc, Mutex, PoisonError};

/// Receives a signal after each successful refresh cycle.
///
/// Called synchronously on the refresh path, so implementations should
/// return quickly and hand any heavy work to their own task.
pub trait RefreshListener: Send + Sync {
    fn on_refresh(&self);
}

impl<F> RefreshListener for F
where
    F: Fn() + Send + Sync,
{
    fn on_refresh(&self) {
        self();
    }
}

/// Shared handle to a registered listener.
pub type ListenerHandle = Arc<dyn RefreshListener>;

fn same_listener(a: &ListenerHandle, b: &ListenerHandle) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Ordered set of listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<ListenerHandle>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `listener` unless it is already present. Returns whether it was added.
    pub fn register(&self, listener: &ListenerHandle) -> bool {
        let mut listeners = self.lock();
        if listeners.iter().any(|l| same_listener(l, listener)) {
            return false;
        }
        listeners.push(Arc::clone(listener));
        true
    }

    /// Remove `listener` if present. Returns whether it was removed.
    pub fn unregister(&self, listener: &ListenerHandle) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));
        listeners.len() != before
    }

    /// Signal every listener in registration order. Returns how many were called.
    ///
    /// Iterates over a copy taken under the lock, so a listener may
    /// register or unregister from inside its callback.
    pub fn notify_all(&self) -> usize {
        let listeners = self.lock().clone();
        for listener in &listeners {
            listener.on_refresh();
        }
        listeners.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ListenerHandle>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, ListenerHandle) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let listener: ListenerHandle = Arc::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (count, listener)
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let registry = ListenerRegistry::new();
        let (count, listener) = counter();

        assert!(registry.register(&listener));
        assert!(!registry.register(&listener));
        assert_eq!(registry.len(), 1);

        registry.notify_all();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregister_reports_presence() {
        let registry = ListenerRegistry::new();
        let (_, listener) = counter();

        assert!(!registry.unregister(&listener));
        registry.register(&listener);
        assert!(registry.unregister(&listener));
        assert!(registry.is_empty());
    }

    #[test]
    fn notifies_in_registration_order() {
        let registry = ListenerRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            let listener: ListenerHandle = Arc::new(move || order.lock().unwrap().push(tag));
            registry.register(&listener);
        }

        assert_eq!(registry.notify_all(), 3);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn listener_may_unregister_itself_during_notify() {
        let registry = Arc::new(ListenerRegistry::new());
        let slot: Arc<Mutex<Option<ListenerHandle>>> = Arc::new(Mutex::new(None));

        let reg = Arc::clone(&registry);
        let me = Arc::clone(&slot);
        let listener: ListenerHandle = Arc::new(move || {
            if let Some(handle) = me.lock().unwrap().take() {
                reg.unregister(&handle);
            }
        });
        *slot.lock().unwrap() = Some(Arc::clone(&listener));
        registry.register(&listener);

        assert_eq!(registry.notify_all(), 1);
        assert!(registry.is_empty());
    }
}
