//! Store change notification.
//!
//! Each cache store owns a [`SubscriberSet`]; a UI binding layer adapts
//! [`SubscriberSet::notify`] fan-out to its own reactivity primitive.
//! Callbacks run synchronously on the notifying task and fire once per
//! merge that inserted at least one new entry, never per entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Callback = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    callbacks: Mutex<HashMap<u64, Callback>>,
    next_id: AtomicU64,
}

/// Registered change callbacks for one store.
#[derive(Clone, Default)]
pub(crate) struct SubscriberSet {
    registry: Arc<Registry>,
}

impl SubscriberSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register `callback`; it stays active until the returned
    /// [`Subscription`] is dropped.
    pub(crate) fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry
            .callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Box::new(callback));
        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Invoke every registered callback once.
    pub(crate) fn notify(&self) {
        let callbacks = self
            .registry
            .callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for callback in callbacks.values() {
            callback();
        }
    }
}

/// Handle for one registered callback; unsubscribes on drop.
#[must_use = "dropping the subscription immediately unsubscribes"]
pub struct Subscription {
    registry: Weak<Registry>,
    id: u64,
}

impl Subscription {
    /// Remove the callback now instead of at drop time.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .callbacks
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&self.id);
        }
    }
}
