// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Denon receiver control.
//!
//! Each type maps to the text the receiver uses on the wire and validates
//! its input at construction time.
//!
//! # Types
//!
//! - [`PowerState`] - `ON` / `STANDBY` for the `PW` command
//! - [`ZoneState`] - `ON` / `OFF` for the `ZM` main zone command
//! - [`MuteState`] - `ON` / `OFF` for the `MU` command
//! - [`Volume`] - master or channel level in half-dB steps (`MV` command)

mod mute;
mod power;
mod volume;
mod zone;

pub use mute::MuteState;
pub use power::PowerState;
pub use volume::Volume;
pub use zone::ZoneState;
