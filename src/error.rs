// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `denon_avr` library.
//!
//! Failures fall into three groups: the transport could not connect or lost
//! the connection, a command response could not be parsed, or a value given
//! to a constrained type was invalid. Status lines that match no known prefix
//! are not errors and never show up here.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport failed to connect, negotiate or exchange data.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// A command response did not match what was expected.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A value failed validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The session has no live transport.
    #[error("receiver is not connected")]
    NotConnected,

    /// `connect` was called on a session that already has a transport.
    #[error("receiver is already connected")]
    AlreadyConnected,
}

/// Errors raised by the transport layer.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Socket-level I/O failure (refused, reset, unreachable).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation did not complete in time.
    #[error("timed out after {0} ms")]
    Timeout(u64),

    /// Telnet negotiation was required but the server did not negotiate.
    #[error("telnet negotiation failed: {0}")]
    NegotiationFailed(String),

    /// The connection was closed while an operation was in flight.
    #[error("connection closed")]
    Closed,

    /// Host or port is missing or malformed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors raised while parsing responses and configuration.
#[derive(Debug, Error)]
pub enum ParseError {
    /// None of the response lines matched the expected prefix or pattern.
    #[error("no response matched {expected} (received {received:?})")]
    NoMatch {
        /// Display form of the matcher that was applied.
        expected: String,
        /// The lines that were inspected.
        received: Vec<String>,
    },

    /// A matched value could not be converted to its typed form.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },

    /// JSON configuration could not be decoded.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An invalid zone state string was provided.
    #[error("invalid zone state: {0}")]
    InvalidZoneState(String),

    /// An invalid mute state string was provided.
    #[error("invalid mute state: {0}")]
    InvalidMuteState(String),

    /// A volume string or dB value could not be represented.
    #[error("invalid volume: {0}")]
    InvalidVolume(String),

    /// An event name outside the known set was given.
    #[error("unknown event name: {0}")]
    UnknownEvent(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 98,
            actual: 120,
        };
        assert_eq!(err.to_string(), "value 120 is out of range [0, 98]");
    }

    #[test]
    fn error_from_connection_error() {
        let err: Error = ConnectionError::Timeout(1200).into();
        assert!(matches!(err, Error::Connection(ConnectionError::Timeout(1200))));
        assert_eq!(err.to_string(), "connection error: timed out after 1200 ms");
    }

    #[test]
    fn no_match_display_lists_received_lines() {
        let err = ParseError::NoMatch {
            expected: "prefix \"PW\"".to_string(),
            received: vec!["MV50".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no response matched prefix \"PW\" (received [\"MV50\"])"
        );
    }

    #[test]
    fn io_error_converts_to_connection_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: ConnectionError = io.into();
        assert!(matches!(err, ConnectionError::Io(_)));
    }
}
