// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast stream of receiver status events.

use tokio::sync::broadcast;

use crate::status::StatusEvent;

/// Events a receiver may fall behind by before it starts losing them.
///
/// A receiver at standby broadcasts a handful of lines per state change, so
/// this leaves plenty of room for a slow consumer.
const BACKLOG: usize = 256;

/// Clonable handle to a session's status stream.
///
/// Every handle shares one channel. A receiver obtained from
/// [`subscribe`](Self::subscribe) sees the events published after that
/// call, in publication order. A receiver that falls more than the backlog
/// behind gets `RecvError::Lagged` and resumes at the oldest event still
/// buffered.
///
/// ```
/// use denon_avr::event::EventBus;
/// use denon_avr::status::StatusEvent;
///
/// let bus = EventBus::default();
/// let mut events = bus.subscribe();
///
/// bus.publish(StatusEvent::MainZoneOn);
/// assert_eq!(events.try_recv().unwrap(), StatusEvent::MainZoneOn);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StatusEvent>,
}

impl EventBus {
    /// Creates a stream buffering up to `backlog` events per receiver.
    ///
    /// # Panics
    ///
    /// Panics if `backlog` is zero.
    #[must_use]
    pub fn new(backlog: usize) -> Self {
        let (sender, _) = broadcast::channel(backlog);
        Self { sender }
    }

    /// Opens a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.sender.subscribe()
    }

    /// Hands `event` to every open receiver.
    ///
    /// Nobody listening is not an error; the event is dropped.
    pub fn publish(&self, event: StatusEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("No status stream receivers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(BACKLOG)
    }
}
