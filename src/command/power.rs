// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power and main zone commands.

use crate::command::Command;
use crate::response::ResponseMatcher;
use crate::types::{PowerState, ZoneState};

/// Command to control receiver power.
///
/// # Examples
///
/// ```
/// use denon_avr::command::{Command, PowerCommand};
/// use denon_avr::types::PowerState;
///
/// assert_eq!(PowerCommand::on().code(), "PWON");
/// assert_eq!(PowerCommand::Set(PowerState::Standby).code(), "PWSTANDBY");
/// assert_eq!(PowerCommand::Query.code(), "PW?");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Query the current power state.
    Query,
    /// Set the power state.
    Set(PowerState),
}

impl PowerCommand {
    /// Creates a command to power the receiver on.
    #[must_use]
    pub const fn on() -> Self {
        Self::Set(PowerState::On)
    }

    /// Creates a command to put the receiver in standby.
    #[must_use]
    pub const fn standby() -> Self {
        Self::Set(PowerState::Standby)
    }
}

impl Command for PowerCommand {
    fn code(&self) -> String {
        match self {
            Self::Query => "PW?".to_string(),
            Self::Set(state) => format!("PW{}", state.as_str()),
        }
    }

    fn response_matcher(&self) -> ResponseMatcher {
        ResponseMatcher::from("PW")
    }
}

/// Command to switch the main zone.
///
/// # Examples
///
/// ```
/// use denon_avr::command::{Command, MainZoneCommand};
///
/// assert_eq!(MainZoneCommand::on().code(), "ZMON");
/// assert_eq!(MainZoneCommand::off().code(), "ZMOFF");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainZoneCommand {
    /// Query the main zone state.
    Query,
    /// Switch the main zone.
    Set(ZoneState),
}

impl MainZoneCommand {
    /// Creates a command to switch the main zone on.
    #[must_use]
    pub const fn on() -> Self {
        Self::Set(ZoneState::On)
    }

    /// Creates a command to switch the main zone off.
    #[must_use]
    pub const fn off() -> Self {
        Self::Set(ZoneState::Off)
    }
}

impl Command for MainZoneCommand {
    fn code(&self) -> String {
        match self {
            Self::Query => "ZM?".to_string(),
            Self::Set(state) => format!("ZM{}", state.as_str()),
        }
    }

    fn response_matcher(&self) -> ResponseMatcher {
        ResponseMatcher::from("ZM")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_command_codes() {
        assert_eq!(PowerCommand::on().code(), "PWON");
        assert_eq!(PowerCommand::standby().code(), "PWSTANDBY");
        assert_eq!(PowerCommand::Query.code(), "PW?");
    }

    #[test]
    fn power_reply_value() {
        let matcher = PowerCommand::Query.response_matcher();
        assert_eq!(matcher.extract("PWSTANDBY"), Some("STANDBY"));
        assert_eq!(matcher.extract("ZMON"), None);
    }

    #[test]
    fn main_zone_command_codes() {
        assert_eq!(MainZoneCommand::on().code(), "ZMON");
        assert_eq!(MainZoneCommand::off().code(), "ZMOFF");
        assert_eq!(MainZoneCommand::Query.code(), "ZM?");
    }

    #[test]
    fn main_zone_reply_value() {
        let matcher = MainZoneCommand::Query.response_matcher();
        assert_eq!(matcher.extract("ZMOFF\r"), Some("OFF"));
    }
}
