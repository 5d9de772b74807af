// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for receiver status events.
//!
//! Callers subscribe by event kind (or by name, via
//! [`StatusKind`](crate::status::StatusKind)'s `FromStr`) and are called
//! back for every matching event, in the order they subscribed.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches events
//! - [`Subscribable`] - Trait for types that support event subscriptions
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use denon_avr::status::{StatusEvent, StatusKind};
//! use denon_avr::subscription::CallbackRegistry;
//!
//! let registry = CallbackRegistry::new();
//! let count = Arc::new(AtomicU32::new(0));
//! let count_clone = count.clone();
//!
//! let kind: StatusKind = "powerOn".parse().unwrap();
//! let id = registry.on(kind, move |_| {
//!     count_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! registry.dispatch(&StatusEvent::PowerOn);
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//!
//! registry.unsubscribe(id);
//! ```

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
