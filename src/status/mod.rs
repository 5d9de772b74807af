// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status line classification.
//!
//! The receiver broadcasts a line whenever its state changes, whether the
//! change came from this client, the remote, or the front panel. Each line
//! starts with a short command code (`PWON`, `ZMOFF`, `MV50`, ...).
//!
//! [`classify`] turns one such line into the [`StatusEvent`]s it denotes:
//! always a [`StatusEvent::Raw`] carrying the bytes, followed by at most one
//! recognized event looked up in [`STATUS_PREFIXES`].
//!
//! # Examples
//!
//! ```
//! use denon_avr::status::{classify, StatusEvent, StatusKind};
//!
//! let events = classify(b"ZMON\r");
//! assert_eq!(events.len(), 2);
//! assert_eq!(events[0].kind(), StatusKind::Raw);
//! assert_eq!(events[1], StatusEvent::MainZoneOn);
//!
//! // Unknown codes are not errors
//! let events = classify(b"MV50\r");
//! assert_eq!(events.len(), 1);
//! ```

mod classifier;
mod status_event;

pub use classifier::{STATUS_PREFIXES, classify, recognize};
pub use status_event::{StatusEvent, StatusKind};
