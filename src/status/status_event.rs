// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status event types.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Tag identifying a status event, without its payload.
///
/// Every tag has a stable name (`"raw"`, `"powerOn"`, ...) so callers can
/// subscribe by name.
///
/// # Examples
///
/// ```
/// use denon_avr::status::StatusKind;
///
/// let kind: StatusKind = "mainZoneOff".parse().unwrap();
/// assert_eq!(kind, StatusKind::MainZoneOff);
/// assert_eq!(kind.name(), "mainZoneOff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusKind {
    /// Any line received from the receiver.
    Raw,
    /// The transport reported it is ready.
    Connected,
    /// The transport closed.
    Disconnected,
    /// The receiver powered on.
    PowerOn,
    /// The receiver went to standby.
    PowerStandby,
    /// The main zone switched on.
    MainZoneOn,
    /// The main zone switched off.
    MainZoneOff,
}

impl StatusKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Raw,
        Self::Connected,
        Self::Disconnected,
        Self::PowerOn,
        Self::PowerStandby,
        Self::MainZoneOn,
        Self::MainZoneOff,
    ];

    /// Returns the event name used for subscriptions.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::PowerOn => "powerOn",
            Self::PowerStandby => "powerStandby",
            Self::MainZoneOn => "mainZoneOn",
            Self::MainZoneOff => "mainZoneOff",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StatusKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ValueError::UnknownEvent(s.to_string()))
    }
}

/// An event produced by a receiver session.
///
/// Only [`StatusEvent::Raw`] carries data: the bytes of the line exactly as
/// the transport delivered them. The other variants are plain notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusEvent {
    /// A line was received.
    Raw(Vec<u8>),
    /// The transport is ready.
    Connected,
    /// The transport closed or the session was disconnected.
    Disconnected,
    /// Line starting with `PWON`.
    PowerOn,
    /// Line starting with `PWSTANDBY`.
    PowerStandby,
    /// Line starting with `ZMON`.
    MainZoneOn,
    /// Line starting with `ZMOFF`.
    MainZoneOff,
}

impl StatusEvent {
    /// Returns the payload-free tag of this event.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        match self {
            Self::Raw(_) => StatusKind::Raw,
            Self::Connected => StatusKind::Connected,
            Self::Disconnected => StatusKind::Disconnected,
            Self::PowerOn => StatusKind::PowerOn,
            Self::PowerStandby => StatusKind::PowerStandby,
            Self::MainZoneOn => StatusKind::MainZoneOn,
            Self::MainZoneOff => StatusKind::MainZoneOff,
        }
    }

    /// Returns the raw line bytes, if this is a [`StatusEvent::Raw`].
    #[must_use]
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            Self::Raw(data) => Some(data),
            _ => None,
        }
    }

    /// Builds the payload-free event for `kind`.
    ///
    /// Returns `None` for [`StatusKind::Raw`], which needs a payload.
    #[must_use]
    pub const fn signal(kind: StatusKind) -> Option<Self> {
        match kind {
            StatusKind::Raw => None,
            StatusKind::Connected => Some(Self::Connected),
            StatusKind::Disconnected => Some(Self::Disconnected),
            StatusKind::PowerOn => Some(Self::PowerOn),
            StatusKind::PowerStandby => Some(Self::PowerStandby),
            StatusKind::MainZoneOn => Some(Self::MainZoneOn),
            StatusKind::MainZoneOff => Some(Self::MainZoneOff),
        }
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(data) => write!(f, "raw({:?})", String::from_utf8_lossy(data)),
            other => f.write_str(other.kind().name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_parse_back() {
        for kind in StatusKind::ALL {
            assert_eq!(kind.name().parse::<StatusKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_names_are_case_sensitive() {
        assert!(matches!(
            "poweron".parse::<StatusKind>(),
            Err(ValueError::UnknownEvent(_))
        ));
    }

    #[test]
    fn signal_matches_kind() {
        for kind in StatusKind::ALL {
            match StatusEvent::signal(kind) {
                Some(event) => assert_eq!(event.kind(), kind),
                None => assert_eq!(kind, StatusKind::Raw),
            }
        }
    }

    #[test]
    fn raw_payload_accessor() {
        let event = StatusEvent::Raw(b"PWON".to_vec());
        assert_eq!(event.raw(), Some(&b"PWON"[..]));
        assert_eq!(StatusEvent::PowerOn.raw(), None);
    }

    #[test]
    fn display() {
        assert_eq!(StatusEvent::Raw(b"MV50".to_vec()).to_string(), "raw(\"MV50\")");
        assert_eq!(StatusEvent::MainZoneOff.to_string(), "mainZoneOff");
    }
}
