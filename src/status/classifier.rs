// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Prefix table and line classifier.

use super::{StatusEvent, StatusKind};

/// Known status prefixes, evaluated in order.
///
/// Matching is case-sensitive and checks only the start of the line; the
/// first entry whose prefix matches wins. No prefix here is a prefix of
/// another, so at most one entry can match any line.
pub const STATUS_PREFIXES: [(&str, StatusKind); 4] = [
    ("PWON", StatusKind::PowerOn),
    ("PWSTANDBY", StatusKind::PowerStandby),
    ("ZMON", StatusKind::MainZoneOn),
    ("ZMOFF", StatusKind::MainZoneOff),
];

/// Returns the status kind denoted by `text`, if any.
///
/// # Examples
///
/// ```
/// use denon_avr::status::{recognize, StatusKind};
///
/// assert_eq!(recognize("PWSTANDBY"), Some(StatusKind::PowerStandby));
/// assert_eq!(recognize("pwon"), None);
/// assert_eq!(recognize("SIDVD"), None);
/// ```
#[must_use]
pub fn recognize(text: &str) -> Option<StatusKind> {
    STATUS_PREFIXES
        .iter()
        .find(|(prefix, _)| text.starts_with(prefix))
        .map(|(_, kind)| *kind)
}

/// Classifies one line received from the receiver.
///
/// The bytes are decoded as UTF-8, replacing invalid sequences. The result
/// always starts with [`StatusEvent::Raw`] holding `line` unchanged, followed
/// by the recognized event if the text starts with a known prefix. Lines
/// matching no prefix yield only the raw event.
#[must_use]
pub fn classify(line: &[u8]) -> Vec<StatusEvent> {
    let text = String::from_utf8_lossy(line);
    let mut events = Vec::with_capacity(2);
    events.push(StatusEvent::Raw(line.to_vec()));

    if let Some(event) = recognize(&text).and_then(StatusEvent::signal) {
        events.push(event);
    }

    events
}
