// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Receiver state tracking.
//!
//! A session folds every classified [`StatusEvent`](crate::status::StatusEvent)
//! into a [`ReceiverState`], so the last known power and main-zone state can
//! be read without querying the receiver.
//!
//! # Examples
//!
//! ```
//! use denon_avr::state::{ReceiverState, SessionState};
//! use denon_avr::status::StatusEvent;
//! use denon_avr::types::PowerState;
//!
//! let mut state = ReceiverState::new();
//! assert_eq!(state.session(), SessionState::Disconnected);
//!
//! assert!(state.apply(&StatusEvent::PowerOn));
//! assert_eq!(state.power(), Some(PowerState::On));
//! ```

mod receiver_state;

pub use receiver_state::{ReceiverState, SessionState};
