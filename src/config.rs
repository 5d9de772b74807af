// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration for a receiver session.
//!
//! Every field except the host has a default, listed in the table below.
//! Caller-supplied values are merged over these defaults, either through
//! [`ConnectionConfigBuilder`] or by loading partial JSON with
//! [`ConnectionConfig::from_json`].
//!
//! | Field | Default | Meaning |
//! |-------|---------|---------|
//! | `port` | 23 | TCP port of the telnet interface |
//! | `connect_timeout` | 2000 ms | Time allowed to open the socket |
//! | `send_timeout` | 1200 ms | Time allowed to write a command |
//! | `exec_timeout` | 1200 ms | Time allowed for a command's response |
//! | `negotiation_mandatory` | `false` | Fail if the server does not negotiate |
//! | `shell_prompt` | `""` | Prompt line to drop from input (empty: none) |
//! | `irs` | `"\r"` | Input record separator |
//! | `ors` | `"\r"` | Output record separator |
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use denon_avr::ConnectionConfig;
//!
//! let config = ConnectionConfig::builder("192.168.1.9")
//!     .exec_timeout(Duration::from_secs(2))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.port(), 23);
//! assert_eq!(config.exec_timeout(), Duration::from_secs(2));
//!
//! let config = ConnectionConfig::from_json(r#"{ "host": "avr.local", "port": 2323 }"#).unwrap();
//! assert_eq!(config.port(), 2323);
//! assert_eq!(config.irs(), "\r");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConnectionError, Error};

/// Default telnet port.
pub const DEFAULT_PORT: u16 = 23;

/// Default socket connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Default command write timeout.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(1200);

/// Default command response timeout.
pub const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_millis(1200);

/// Default input and output record separator.
pub const DEFAULT_RECORD_SEPARATOR: &str = "\r";

/// Settings for one receiver connection.
///
/// Immutable once built; a session copies it when it connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    #[serde(rename = "connect_timeout_ms", with = "millis")]
    connect_timeout: Duration,
    #[serde(rename = "send_timeout_ms", with = "millis")]
    send_timeout: Duration,
    #[serde(rename = "exec_timeout_ms", with = "millis")]
    exec_timeout: Duration,
    negotiation_mandatory: bool,
    shell_prompt: String,
    irs: String,
    ors: String,
}

impl Default for ConnectionConfig {
    /// Defaults with an empty host; not usable until a host is set.
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            exec_timeout: DEFAULT_EXEC_TIMEOUT,
            negotiation_mandatory: false,
            shell_prompt: String::new(),
            irs: DEFAULT_RECORD_SEPARATOR.to_string(),
            ors: DEFAULT_RECORD_SEPARATOR.to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Creates a configuration for `host` with every other field at its default.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Starts a builder for `host`.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new(host)
    }

    /// Loads a configuration from JSON, filling absent fields with defaults.
    ///
    /// Timeouts are given in milliseconds (`send_timeout_ms`, ...).
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` for malformed JSON and `Error::Connection` if
    /// the resulting configuration has no usable host or separator.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json).map_err(crate::error::ParseError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be used to connect.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::InvalidAddress` for an empty host or a zero
    /// port, or if the input separator is empty.
    pub fn validate(&self) -> Result<(), ConnectionError> {
        if self.host.trim().is_empty() {
            return Err(ConnectionError::InvalidAddress("host is required".to_string()));
        }
        if self.port == 0 {
            return Err(ConnectionError::InvalidAddress("port must not be 0".to_string()));
        }
        if self.irs.is_empty() {
            return Err(ConnectionError::InvalidAddress(
                "input record separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the receiver host name or address.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the telnet port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the socket connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the command write timeout.
    #[must_use]
    pub fn send_timeout(&self) -> Duration {
        self.send_timeout
    }

    /// Returns the command response timeout.
    #[must_use]
    pub fn exec_timeout(&self) -> Duration {
        self.exec_timeout
    }

    /// Returns whether the server must open with telnet negotiation.
    #[must_use]
    pub fn negotiation_mandatory(&self) -> bool {
        self.negotiation_mandatory
    }

    /// Returns the prompt line dropped from input; empty means none.
    #[must_use]
    pub fn shell_prompt(&self) -> &str {
        &self.shell_prompt
    }

    /// Returns the input record separator.
    #[must_use]
    pub fn irs(&self) -> &str {
        &self.irs
    }

    /// Returns the output record separator.
    #[must_use]
    pub fn ors(&self) -> &str {
        &self.ors
    }
}

/// Builder merging caller-supplied settings over the defaults.
#[derive(Debug, Clone)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Creates a builder for `host` with all defaults.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            config: ConnectionConfig::new(host),
        }
    }

    /// Sets the telnet port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the socket connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the command write timeout.
    #[must_use]
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.config.send_timeout = timeout;
        self
    }

    /// Sets the command response timeout.
    #[must_use]
    pub fn exec_timeout(mut self, timeout: Duration) -> Self {
        self.config.exec_timeout = timeout;
        self
    }

    /// Requires the server to open with telnet negotiation.
    #[must_use]
    pub fn negotiation_mandatory(mut self, mandatory: bool) -> Self {
        self.config.negotiation_mandatory = mandatory;
        self
    }

    /// Sets a prompt line to drop from input.
    #[must_use]
    pub fn shell_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.shell_prompt = prompt.into();
        self
    }

    /// Sets the input record separator.
    #[must_use]
    pub fn irs(mut self, separator: impl Into<String>) -> Self {
        self.config.irs = separator.into();
        self
    }

    /// Sets the output record separator.
    #[must_use]
    pub fn ors(mut self, separator: impl Into<String>) -> Self {
        self.config.ors = separator.into();
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// See [`ConnectionConfig::validate`].
    pub fn build(self) -> Result<ConnectionConfig, ConnectionError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Serializes a `Duration` as whole milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        // Safe: configured timeouts never approach u64::MAX milliseconds
        #[allow(clippy::cast_possible_truncation)]
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = ConnectionConfig::new("192.168.1.9");
        assert_eq!(config.host(), "192.168.1.9");
        assert_eq!(config.port(), 23);
        assert_eq!(config.send_timeout(), Duration::from_millis(1200));
        assert_eq!(config.exec_timeout(), Duration::from_millis(1200));
        assert_eq!(config.connect_timeout(), Duration::from_millis(2000));
        assert!(!config.negotiation_mandatory());
        assert_eq!(config.shell_prompt(), "");
        assert_eq!(config.irs(), "\r");
        assert_eq!(config.ors(), "\r");
        assert_eq!(config.address(), "192.168.1.9:23");
    }

    #[test]
    fn builder_overrides_only_given_fields() {
        let config = ConnectionConfig::builder("avr.local")
            .port(2323)
            .ors("\r\n")
            .negotiation_mandatory(true)
            .build()
            .unwrap();

        assert_eq!(config.port(), 2323);
        assert_eq!(config.ors(), "\r\n");
        assert!(config.negotiation_mandatory());
        assert_eq!(config.irs(), "\r");
        assert_eq!(config.exec_timeout(), DEFAULT_EXEC_TIMEOUT);
    }

    #[test]
    fn builder_requires_host() {
        let result = ConnectionConfig::builder("  ").build();
        assert!(matches!(result, Err(ConnectionError::InvalidAddress(_))));
    }

    #[test]
    fn builder_rejects_empty_irs() {
        let result = ConnectionConfig::builder("avr").irs("").build();
        assert!(result.is_err());
    }

    #[test]
    fn from_json_merges_over_defaults() {
        let config =
            ConnectionConfig::from_json(r#"{ "host": "10.0.0.5", "exec_timeout_ms": 3000 }"#)
                .unwrap();
        assert_eq!(config.host(), "10.0.0.5");
        assert_eq!(config.exec_timeout(), Duration::from_secs(3));
        assert_eq!(config.send_timeout(), DEFAULT_SEND_TIMEOUT);
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn from_json_without_host_fails() {
        let result = ConnectionConfig::from_json(r#"{ "port": 23 }"#);
        assert!(matches!(
            result,
            Err(Error::Connection(ConnectionError::InvalidAddress(_)))
        ));
    }

    #[test]
    fn from_json_malformed_fails() {
        let result = ConnectionConfig::from_json("{ host: ");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn json_round_trip() {
        let config = ConnectionConfig::builder("avr").port(24).build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"send_timeout_ms\":1200"));
        assert_eq!(ConnectionConfig::from_json(&json).unwrap(), config);
    }
}
