// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command response matching.
//!
//! A command sent to the receiver is answered by a line that starts with the
//! command's family code: `PW?` is answered by `PWON` or `PWSTANDBY`, `MV?`
//! by `MV50`. A [`ResponseMatcher`] states what the answer must look like and
//! extracts the interesting part.
//!
//! # Examples
//!
//! ```
//! use denon_avr::response::{parse_response, ResponseMatcher};
//!
//! let value = parse_response(&["PWON"], &ResponseMatcher::from("PW")).unwrap();
//! assert_eq!(value, "ON");
//!
//! let volume = ResponseMatcher::volume();
//! assert_eq!(parse_response(&["MV50"], &volume).unwrap(), "MV50");
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

/// Pattern matched by volume responses (`MV50`, `MV505`).
static VOLUME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[A-Z]{2}[0-9]{2,3}$").expect("volume pattern is valid"));

/// Describes the expected shape of a response line.
#[derive(Debug, Clone)]
pub enum ResponseMatcher {
    /// The line must start with this literal; the value is the remainder.
    Prefix(String),
    /// The line must contain a match of this pattern; the value is the match.
    Pattern(Regex),
}

impl ResponseMatcher {
    /// Matcher for volume responses: two capitals followed by 2-3 digits at
    /// the end of the line.
    #[must_use]
    pub fn volume() -> Self {
        Self::Pattern(VOLUME_PATTERN.clone())
    }

    /// Extracts the value from `line`, or `None` if it does not match.
    ///
    /// Trailing CR and LF characters are ignored.
    #[must_use]
    pub fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        let line = line.trim_end_matches(['\r', '\n']);
        match self {
            Self::Prefix(prefix) => line.strip_prefix(prefix.as_str()),
            Self::Pattern(pattern) => pattern.find(line).map(|m| m.as_str()),
        }
    }
}

impl fmt::Display for ResponseMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(prefix) => write!(f, "prefix {prefix:?}"),
            Self::Pattern(pattern) => write!(f, "pattern /{}/", pattern.as_str()),
        }
    }
}

impl From<&str> for ResponseMatcher {
    fn from(prefix: &str) -> Self {
        Self::Prefix(prefix.to_string())
    }
}

impl From<String> for ResponseMatcher {
    fn from(prefix: String) -> Self {
        Self::Prefix(prefix)
    }
}

impl From<Regex> for ResponseMatcher {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

/// Returns the value extracted from the first line that matches.
///
/// Lines that do not match are skipped; only when no line matches at all
/// does parsing fail.
///
/// # Errors
///
/// Returns [`ParseError::NoMatch`] if no line matches `matcher`.
pub fn parse_response<S: AsRef<str>>(
    lines: &[S],
    matcher: &ResponseMatcher,
) -> Result<String, ParseError> {
    lines
        .iter()
        .find_map(|line| matcher.extract(line.as_ref()))
        .map(str::to_string)
        .ok_or_else(|| ParseError::NoMatch {
            expected: matcher.to_string(),
            received: lines.iter().map(|l| l.as_ref().to_string()).collect(),
        })
}
