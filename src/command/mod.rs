// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Denon command definitions.
//!
//! This module provides typed representations of the receiver's telnet
//! commands. Each command knows its wire code and how to pick the value out
//! of the receiver's reply.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Wire codes |
//! |-------------|---------|---------|
//! | [`PowerCommand`] | Receiver power | `PWON`, `PWSTANDBY`, `PW?` |
//! | [`MainZoneCommand`] | Main zone on/off | `ZMON`, `ZMOFF`, `ZM?` |
//! | [`VolumeCommand`] | Master volume | `MVUP`, `MVDOWN`, `MV50`, `MV?` |
//! | [`MuteCommand`] | Mute | `MUON`, `MUOFF`, `MU?` |
//! | [`SourceCommand`] | Input source | `SIDVD`, `SI?` |
//!
//! # Command Structure
//!
//! A Denon command is a two letter code followed by a parameter, sent as one
//! line. `?` as the parameter queries the current value. The output record
//! separator is appended by the transport, not by the command.
//!
//! # Examples
//!
//! ```
//! use denon_avr::command::{Command, PowerCommand, VolumeCommand};
//! use denon_avr::types::{PowerState, Volume};
//!
//! let cmd = PowerCommand::Set(PowerState::On);
//! assert_eq!(cmd.code(), "PWON");
//!
//! let vol = VolumeCommand::Set(Volume::with_half_step(50, true).unwrap());
//! assert_eq!(vol.code(), "MV505");
//! ```

mod power;
mod source;
mod volume;

pub use power::{MainZoneCommand, PowerCommand};
pub use source::SourceCommand;
pub use volume::{MuteCommand, VolumeCommand};

use crate::response::ResponseMatcher;

/// A command that can be sent to a receiver.
pub trait Command {
    /// Returns the wire code without the record separator.
    ///
    /// For example, `"PWON"`, `"MV?"`, `"SIDVD"`.
    fn code(&self) -> String;

    /// Returns the matcher that extracts the value from the reply.
    fn response_matcher(&self) -> ResponseMatcher;
}
