// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Mute state of the main zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MuteState {
    /// Audio is muted.
    On,
    /// Audio is not muted.
    Off,
}

impl MuteState {
    /// Returns the wire representation used after the `MU` code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Returns `true` if audio is muted.
    #[must_use]
    pub const fn is_muted(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for MuteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MuteState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            _ => Err(ValueError::InvalidMuteState(s.to_string())),
        }
    }
}

impl From<bool> for MuteState {
    fn from(muted: bool) -> Self {
        if muted { Self::On } else { Self::Off }
    }
}
