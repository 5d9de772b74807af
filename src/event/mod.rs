// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stream-style access to status events.
//!
//! Besides callbacks, a session publishes every [`StatusEvent`] on an
//! [`EventBus`] backed by tokio's broadcast channel, for callers that prefer
//! to `recv().await` in a loop.
//!
//! [`StatusEvent`]: crate::status::StatusEvent

mod event_bus;

pub use event_bus::EventBus;
