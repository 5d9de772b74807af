// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that emit status events.

use crate::status::{StatusEvent, StatusKind};
use crate::subscription::SubscriptionId;

/// Trait for types that support status event subscriptions.
///
/// Only [`on`](Self::on), [`on_event`](Self::on_event) and
/// [`unsubscribe`](Self::unsubscribe) must be implemented; the named
/// helpers are built on [`on`](Self::on).
///
/// # Examples
///
/// ```no_run
/// use denon_avr::{ConnectionConfig, DenonAvr};
/// use denon_avr::subscription::Subscribable;
///
/// # async fn example() -> denon_avr::Result<()> {
/// let avr = DenonAvr::new(ConnectionConfig::new("192.168.1.9"));
///
/// let sub_id = avr.on_main_zone_on(|| println!("main zone on"));
/// avr.on_raw(|line| println!("{}", String::from_utf8_lossy(line)));
///
/// avr.connect().await?;
///
/// // Unsubscribe when no longer needed
/// avr.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to events of one kind.
    fn on<F>(&self, kind: StatusKind, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusEvent) + Send + Sync + 'static;

    /// Subscribes to every event.
    fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusEvent) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Subscribes to every received line.
    ///
    /// The callback receives the line bytes, recognized or not.
    fn on_raw<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        self.on(StatusKind::Raw, move |event| {
            if let Some(data) = event.raw() {
                callback(data);
            }
        })
    }

    /// Subscribes to the transport becoming ready.
    fn on_connected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(StatusKind::Connected, move |_| callback())
    }

    /// Subscribes to the connection closing.
    fn on_disconnected<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(StatusKind::Disconnected, move |_| callback())
    }

    /// Subscribes to `PWON` broadcasts.
    fn on_power_on<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(StatusKind::PowerOn, move |_| callback())
    }

    /// Subscribes to `PWSTANDBY` broadcasts.
    fn on_power_standby<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(StatusKind::PowerStandby, move |_| callback())
    }

    /// Subscribes to `ZMON` broadcasts.
    fn on_main_zone_on<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(StatusKind::MainZoneOn, move |_| callback())
    }

    /// Subscribes to `ZMOFF` broadcasts.
    fn on_main_zone_off<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on(StatusKind::MainZoneOff, move |_| callback())
    }
}
