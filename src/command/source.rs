// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input source selection.

use crate::command::Command;
use crate::response::ResponseMatcher;

/// Command to select or query the input source.
///
/// Source names are model dependent (`DVD`, `TUNER`, `SAT/CBL`, ...) and are
/// passed through as given.
///
/// # Examples
///
/// ```
/// use denon_avr::command::{Command, SourceCommand};
///
/// assert_eq!(SourceCommand::select("DVD").code(), "SIDVD");
/// assert_eq!(SourceCommand::Query.code(), "SI?");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCommand {
    /// Query the selected source.
    Query,
    /// Select a source by its wire name.
    Select(String),
}

impl SourceCommand {
    /// Creates a command selecting `source`.
    #[must_use]
    pub fn select(source: impl Into<String>) -> Self {
        Self::Select(source.into())
    }
}

impl Command for SourceCommand {
    fn code(&self) -> String {
        match self {
            Self::Query => "SI?".to_string(),
            Self::Select(source) => format!("SI{source}"),
        }
    }

    fn response_matcher(&self) -> ResponseMatcher {
        ResponseMatcher::from("SI")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_passes_name_through() {
        assert_eq!(SourceCommand::select("SAT/CBL").code(), "SISAT/CBL");
    }

    #[test]
    fn reply_value_is_source_name() {
        let matcher = SourceCommand::Query.response_matcher();
        assert_eq!(matcher.extract("SITUNER\r"), Some("TUNER"));
    }
}
