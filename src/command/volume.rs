// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volume and mute commands.

use crate::command::Command;
use crate::response::ResponseMatcher;
use crate::types::{MuteState, Volume};

/// Command to control the master volume.
///
/// Replies carry the code and the level (`MV50`, `MV505`), so the matcher is
/// a pattern rather than a prefix. `MVMAX` lines do not match it, so a
/// query answered with `MVMAX 98` alone fails with a parse error.
///
/// # Examples
///
/// ```
/// use denon_avr::command::{Command, VolumeCommand};
/// use denon_avr::types::Volume;
///
/// assert_eq!(VolumeCommand::Up.code(), "MVUP");
/// assert_eq!(VolumeCommand::Set(Volume::new(50).unwrap()).code(), "MV50");
///
/// let matcher = VolumeCommand::Query.response_matcher();
/// assert_eq!(matcher.extract("MV50"), Some("MV50"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeCommand {
    /// Query the current level.
    Query,
    /// Raise the level by one step.
    Up,
    /// Lower the level by one step.
    Down,
    /// Set an absolute level.
    Set(Volume),
}

impl Command for VolumeCommand {
    fn code(&self) -> String {
        match self {
            Self::Query => "MV?".to_string(),
            Self::Up => "MVUP".to_string(),
            Self::Down => "MVDOWN".to_string(),
            Self::Set(volume) => format!("MV{}", volume.as_ascii()),
        }
    }

    fn response_matcher(&self) -> ResponseMatcher {
        ResponseMatcher::volume()
    }
}

/// Command to control muting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteCommand {
    /// Query the mute state.
    Query,
    /// Set the mute state.
    Set(MuteState),
}

impl Command for MuteCommand {
    fn code(&self) -> String {
        match self {
            Self::Query => "MU?".to_string(),
            Self::Set(state) => format!("MU{}", state.as_str()),
        }
    }

    fn response_matcher(&self) -> ResponseMatcher {
        ResponseMatcher::from("MU")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_command_codes() {
        assert_eq!(VolumeCommand::Query.code(), "MV?");
        assert_eq!(VolumeCommand::Up.code(), "MVUP");
        assert_eq!(VolumeCommand::Down.code(), "MVDOWN");
    }

    #[test]
    fn volume_set_uses_ascii_form() {
        let whole = Volume::new(5).unwrap();
        assert_eq!(VolumeCommand::Set(whole).code(), "MV05");

        let half = Volume::with_half_step(50, true).unwrap();
        assert_eq!(VolumeCommand::Set(half).code(), "MV505");
    }

    #[test]
    fn volume_matcher_rejects_max_line() {
        let matcher = VolumeCommand::Query.response_matcher();
        assert_eq!(matcher.extract("MVMAX 98"), None);
        assert_eq!(matcher.extract("MV455\r"), Some("MV455"));
    }

    #[test]
    fn mute_command_codes() {
        assert_eq!(MuteCommand::Set(MuteState::On).code(), "MUON");
        assert_eq!(MuteCommand::Set(MuteState::Off).code(), "MUOFF");
        assert_eq!(MuteCommand::Query.code(), "MU?");
    }
}
