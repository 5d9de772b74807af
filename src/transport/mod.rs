// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer between a receiver session and the network.
//!
//! A [`Transport`] owns one connection. It delivers what it receives as a
//! stream of [`TransportEvent`]s and answers [`Transport::exec`] with the
//! next line the receiver sends. The session never touches sockets itself.
//!
//! # Implementations
//!
//! - [`TelnetTransport`]: line-oriented telnet over TCP, the receiver's
//!   native control protocol

mod codec;
mod telnet;

pub use telnet::TelnetTransport;

use tokio::sync::mpsc;

use crate::config::ConnectionConfig;
use crate::error::ConnectionError;

/// Capacity of the event channel between a transport and its session.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Receiving half of a transport's event channel.
pub type TransportEvents = mpsc::Receiver<TransportEvent>;

/// Notification emitted by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is established and ready for commands.
    Ready,
    /// One line of input, without its record separator.
    Data(Vec<u8>),
    /// A command got no response in time.
    Timeout,
    /// The connection closed.
    Close,
}

/// A connection to a receiver.
///
/// The event channel is returned together with the connection, so every
/// notification from `Ready` onward reaches whoever holds the receiver.
#[allow(async_fn_in_trait)]
pub trait Transport: Sized {
    /// Opens a connection using `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the connection cannot be established or
    /// negotiated.
    async fn connect(config: &ConnectionConfig)
    -> Result<(Self, TransportEvents), ConnectionError>;

    /// Sends `command` and returns the next line received.
    ///
    /// The returned line is not delivered as [`TransportEvent::Data`].
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` on write failure, timeout, or if the
    /// connection closes before a line arrives.
    async fn exec(&self, command: &str) -> Result<String, ConnectionError>;

    /// Tears the connection down. Calling it again has no effect.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the teardown itself fails.
    async fn destroy(&self) -> Result<(), ConnectionError>;
}
