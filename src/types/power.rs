// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Receiver power state.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the power state of the whole receiver.
///
/// Denon receivers never fully power off over the network; "off" is the
/// `STANDBY` state, from which the telnet interface still answers.
///
/// # Examples
///
/// ```
/// use denon_avr::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "ON");
/// assert_eq!(PowerState::Standby.as_str(), "STANDBY");
/// assert_eq!("standby".parse::<PowerState>().unwrap(), PowerState::Standby);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PowerState {
    /// Receiver is on.
    On,
    /// Receiver is in standby.
    Standby,
}

impl PowerState {
    /// Returns the wire representation used after the `PW` code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Standby => "STANDBY",
        }
    }

    /// Returns `true` if the receiver is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ON" => Ok(Self::On),
            "STANDBY" | "OFF" => Ok(Self::Standby),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Standby }
    }
}
