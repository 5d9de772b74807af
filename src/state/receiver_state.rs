// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last known receiver state.

use crate::status::StatusEvent;
use crate::types::{PowerState, ZoneState};

/// Connection state of a session.
///
/// `Connecting` is held only while the transport's connect is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub enum SessionState {
    /// No transport.
    #[default]
    Disconnected,
    /// The transport is being opened.
    Connecting,
    /// The transport is open.
    Connected,
}

/// Tracked state of a receiver.
///
/// Power and zone states are `None` until the receiver reports them, either
/// through a broadcast or a query response.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ReceiverState {
    session: SessionState,
    power: Option<PowerState>,
    main_zone: Option<ZoneState>,
}

impl ReceiverState {
    /// Creates an empty, disconnected state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session state.
    #[must_use]
    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Returns `true` if the session has an open transport.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session == SessionState::Connected
    }

    /// Returns the last known power state.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        self.power
    }

    /// Returns the last known main zone state.
    #[must_use]
    pub fn main_zone(&self) -> Option<ZoneState> {
        self.main_zone
    }

    /// Sets the session state. Returns `true` if it changed.
    pub fn set_session(&mut self, session: SessionState) -> bool {
        replace(&mut self.session, session)
    }

    /// Records a power state. Returns `true` if it changed.
    pub fn set_power(&mut self, power: PowerState) -> bool {
        replace(&mut self.power, Some(power))
    }

    /// Records a main zone state. Returns `true` if it changed.
    pub fn set_main_zone(&mut self, zone: ZoneState) -> bool {
        replace(&mut self.main_zone, Some(zone))
    }

    /// Folds a status event into the state.
    ///
    /// Returns `true` if the state actually changed. Raw lines never change
    /// it; their recognized counterpart does.
    pub fn apply(&mut self, event: &StatusEvent) -> bool {
        match event {
            StatusEvent::Raw(_) => false,
            StatusEvent::Connected => self.set_session(SessionState::Connected),
            StatusEvent::Disconnected => self.set_session(SessionState::Disconnected),
            StatusEvent::PowerOn => self.set_power(PowerState::On),
            StatusEvent::PowerStandby => self.set_power(PowerState::Standby),
            StatusEvent::MainZoneOn => self.set_main_zone(ZoneState::On),
            StatusEvent::MainZoneOff => self.set_main_zone(ZoneState::Off),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_unknown() {
        let state = ReceiverState::new();
        assert_eq!(state.session(), SessionState::Disconnected);
        assert!(!state.is_connected());
        assert_eq!(state.power(), None);
        assert_eq!(state.main_zone(), None);
    }

    #[test]
    fn apply_reports_changes_only() {
        let mut state = ReceiverState::new();
        assert!(state.apply(&StatusEvent::PowerOn));
        assert!(!state.apply(&StatusEvent::PowerOn));
        assert!(state.apply(&StatusEvent::PowerStandby));
        assert_eq!(state.power(), Some(PowerState::Standby));
    }

    #[test]
    fn apply_tracks_main_zone() {
        let mut state = ReceiverState::new();
        state.apply(&StatusEvent::MainZoneOn);
        assert_eq!(state.main_zone(), Some(ZoneState::On));
        state.apply(&StatusEvent::MainZoneOff);
        assert_eq!(state.main_zone(), Some(ZoneState::Off));
    }

    #[test]
    fn apply_tracks_session() {
        let mut state = ReceiverState::new();
        assert!(state.apply(&StatusEvent::Connected));
        assert!(state.is_connected());
        assert!(state.apply(&StatusEvent::Disconnected));
        assert_eq!(state.session(), SessionState::Disconnected);
    }

    #[test]
    fn raw_lines_do_not_change_state() {
        let mut state = ReceiverState::new();
        assert!(!state.apply(&StatusEvent::Raw(b"PWON".to_vec())));
        assert_eq!(state, ReceiverState::new());
    }
}
