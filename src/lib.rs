// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `denon_avr` - A Rust library to control Denon AV receivers.
//!
//! Denon receivers expose a line-based telnet protocol on TCP port 23. The
//! receiver broadcasts a status line whenever something changes and answers
//! commands with a line of its own. This library connects to that port,
//! turns the broadcast lines into typed events and sends commands.
//!
//! # Supported Features
//!
//! - **Status events**: power on/standby and main zone on/off, plus every raw line
//! - **Commands**: power, main zone, master volume, mute, input source
//! - **Raw access**: send any command and extract its value by prefix or regex
//!
//! # Quick Start
//!
//! ```no_run
//! use denon_avr::{ConnectionConfig, DenonAvr};
//!
//! #[tokio::main]
//! async fn main() -> denon_avr::Result<()> {
//!     let avr = DenonAvr::new(ConnectionConfig::new("192.168.1.9"));
//!     avr.connect().await?;
//!
//!     avr.power_on().await?;
//!     let volume = avr.volume().await?;
//!     println!("volume is {} dB", volume.to_db(denon_avr::Volume::MASTER_ZERO_DB));
//!
//!     avr.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Listening for Status Changes
//!
//! ```no_run
//! use denon_avr::{ConnectionConfig, DenonAvr, StatusEvent};
//! use denon_avr::subscription::Subscribable;
//!
//! #[tokio::main]
//! async fn main() -> denon_avr::Result<()> {
//!     let avr = DenonAvr::new(ConnectionConfig::new("192.168.1.9"));
//!
//!     // Callbacks
//!     avr.on_main_zone_on(|| println!("main zone switched on"));
//!
//!     // Or a stream
//!     let mut events = avr.events();
//!     avr.connect().await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         if event == StatusEvent::Disconnected {
//!             break;
//!         }
//!         println!("{event}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The library logs through [`tracing`](https://docs.rs/tracing) and never
//! installs a subscriber.

pub mod command;
pub mod config;
mod device;
pub mod error;
pub mod event;
pub mod response;
pub mod state;
pub mod status;
pub mod subscription;
pub mod transport;
pub mod types;

pub use command::{
    Command, MainZoneCommand, MuteCommand, PowerCommand, SourceCommand, VolumeCommand,
};
pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use device::DenonAvr;
pub use error::{ConnectionError, Error, ParseError, Result, ValueError};
pub use response::{ResponseMatcher, parse_response};
pub use state::{ReceiverState, SessionState};
pub use status::{StatusEvent, StatusKind, classify};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use transport::{TelnetTransport, Transport, TransportEvent};
pub use types::{MuteState, PowerState, Volume, ZoneState};
