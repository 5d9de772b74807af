// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for status event subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::status::{StatusEvent, StatusKind};

/// Unique identifier for a subscription.
///
/// IDs increase monotonically within a registry, which is what gives
/// callbacks their delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for event callbacks.
type EventCallback = Arc<dyn Fn(&StatusEvent) + Send + Sync>;

/// A registered callback and the kind it listens to (`None`: every kind).
struct Subscription {
    filter: Option<StatusKind>,
    callback: EventCallback,
}

impl Subscription {
    fn accepts(&self, kind: StatusKind) -> bool {
        self.filter.is_none_or(|filter| filter == kind)
    }
}

/// Registry for managing status event callbacks.
///
/// Callbacks are delivered in subscription order. Dispatch copies the
/// matching callbacks out of the lock before calling them, so a callback may
/// itself subscribe or unsubscribe.
///
/// # Thread Safety
///
/// The registry is fully thread-safe and can be shared between tasks.
/// Callbacks are wrapped in `Arc` so they can be cloned cheaply.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Subscriptions keyed by ID, hence in subscription order.
    subscriptions: RwLock<BTreeMap<SubscriptionId, Subscription>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            subscriptions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn insert(&self, filter: Option<StatusKind>, callback: EventCallback) -> SubscriptionId {
        let id = self.next_id();
        self.subscriptions
            .write()
            .insert(id, Subscription { filter, callback });
        id
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for events of one kind.
    pub fn on<F>(&self, kind: StatusKind, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusEvent) + Send + Sync + 'static,
    {
        self.insert(Some(kind), Arc::new(callback))
    }

    /// Registers a callback for every event.
    pub fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusEvent) + Send + Sync + 'static,
    {
        self.insert(None, Arc::new(callback))
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscriptions.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.subscriptions.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches an event to every callback subscribed to its kind.
    pub fn dispatch(&self, event: &StatusEvent) {
        let kind = event.kind();
        let callbacks: Vec<EventCallback> = self
            .subscriptions
            .read()
            .values()
            .filter(|sub| sub.accepts(kind))
            .map(|sub| Arc::clone(&sub.callback))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    use parking_lot::Mutex;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn kind_callback_and_unsubscribe() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on(StatusKind::PowerOn, move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StatusEvent::PowerOn);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        assert!(registry.is_empty());

        registry.dispatch(&StatusEvent::PowerOn);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callbacks_only_see_their_kind() {
        let registry = CallbackRegistry::new();
        let on = Arc::new(AtomicU32::new(0));
        let off = Arc::new(AtomicU32::new(0));
        let on_clone = on.clone();
        let off_clone = off.clone();

        registry.on(StatusKind::MainZoneOn, move |_| {
            on_clone.fetch_add(1, Ordering::SeqCst);
        });
        registry.on(StatusKind::MainZoneOff, move |_| {
            off_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StatusEvent::Raw(b"ZMON".to_vec()));
        registry.dispatch(&StatusEvent::MainZoneOn);

        assert_eq!(on.load(Ordering::SeqCst), 1);
        assert_eq!(off.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn raw_callback_receives_lines_only() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();

        registry.on(StatusKind::Raw, move |event| {
            received_clone.lock().push(event.clone());
        });

        registry.dispatch(&StatusEvent::Raw(b"MV50".to_vec()));
        registry.dispatch(&StatusEvent::PowerOn);

        assert_eq!(*received.lock(), vec![StatusEvent::Raw(b"MV50".to_vec())]);
    }

    #[test]
    fn on_event_sees_everything() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        registry.on_event(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StatusEvent::Connected);
        registry.dispatch(&StatusEvent::Raw(Vec::new()));
        registry.dispatch(&StatusEvent::Disconnected);

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn delivery_follows_subscription_order() {
        let registry = CallbackRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 0..5 {
            let order = order.clone();
            registry.on(StatusKind::PowerStandby, move |_| order.lock().push(n));
        }

        registry.dispatch(&StatusEvent::PowerStandby);
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn callback_may_subscribe_during_dispatch() {
        let registry = Arc::new(CallbackRegistry::new());
        let inner = Arc::clone(&registry);

        registry.on(StatusKind::Connected, move |_| {
            inner.on(StatusKind::Disconnected, |_| {});
        });

        registry.dispatch(&StatusEvent::Connected);
        assert_eq!(registry.callback_count(), 2);
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_clear() {
        let registry = CallbackRegistry::new();
        registry.on(StatusKind::Raw, |_| {});
        registry.on(StatusKind::PowerOn, |_| {});
        registry.on_event(|_| {});
        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();
        let id1 = registry.on(StatusKind::Raw, |_| {});
        let id2 = registry.on(StatusKind::PowerOn, |_| {});
        assert_ne!(id1, id2);
        assert!(id1 < id2);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_event(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}
