// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Receiver session.
//!
//! A [`DenonAvr`] owns at most one transport at a time. Everything the
//! transport reports is handled by a single dispatcher task, which classifies
//! each line and hands the resulting events to the subscribers in order:
//!
//! 1. the tracked [`ReceiverState`] is updated,
//! 2. callbacks registered through [`Subscribable`] run,
//! 3. the event is published on the broadcast channel from [`DenonAvr::events`].
//!
//! Lines that answer a [`DenonAvr::send`] are returned to the caller and never
//! reach the dispatcher.
//!
//! # Examples
//!
//! ```no_run
//! use denon_avr::{ConnectionConfig, DenonAvr};
//! use denon_avr::subscription::Subscribable;
//!
//! # async fn example() -> denon_avr::Result<()> {
//! let avr = DenonAvr::new(ConnectionConfig::new("192.168.1.9"));
//!
//! avr.on_power_standby(|| println!("receiver went to standby"));
//! avr.connect().await?;
//!
//! let power = avr.send("PW?", "PW").await?;
//! println!("power is {power}");
//!
//! avr.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::command::{
    Command, MainZoneCommand, MuteCommand, PowerCommand, SourceCommand, VolumeCommand,
};
use crate::config::ConnectionConfig;
use crate::error::{ConnectionError, Error, ParseError};
use crate::event::EventBus;
use crate::response::{ResponseMatcher, parse_response};
use crate::state::{ReceiverState, SessionState};
use crate::status::{StatusEvent, StatusKind, classify};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::transport::{TelnetTransport, Transport, TransportEvent, TransportEvents};
use crate::types::{MuteState, PowerState, Volume, ZoneState};

/// A connection to a Denon AV receiver.
///
/// The type parameter selects the transport. It defaults to
/// [`TelnetTransport`], the receiver's native control protocol.
///
/// # Lifecycle
///
/// `Disconnected --connect--> Connected --close or disconnect--> Disconnected`
///
/// A session can be connected again after it has been disconnected. Callbacks
/// and event receivers survive reconnects.
#[derive(Debug)]
pub struct DenonAvr<T: Transport = TelnetTransport> {
    config: ConnectionConfig,
    transport: Mutex<Option<Arc<T>>>,
    emitter: Emitter,
    generation: Arc<AtomicU64>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl DenonAvr {
    /// Creates a telnet session for the receiver described by `config`.
    ///
    /// Nothing is opened until [`connect`](Self::connect) is called.
    #[must_use]
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_config(config)
    }
}

impl<T: Transport> DenonAvr<T> {
    /// Creates a session over a custom transport type.
    #[must_use]
    pub fn with_config(config: ConnectionConfig) -> Self {
        Self {
            config,
            transport: Mutex::new(None),
            emitter: Emitter::default(),
            generation: Arc::new(AtomicU64::new(0)),
            dispatcher: Mutex::new(None),
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Returns a snapshot of the tracked receiver state.
    #[must_use]
    pub fn state(&self) -> ReceiverState {
        self.emitter.state.read().clone()
    }

    /// Returns `true` while the session has an open transport.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.emitter.state.read().is_connected()
    }

    /// Subscribes to the stream of status events.
    ///
    /// The receiver sees every event published after this call. A receiver
    /// that falls too far behind gets `RecvError::Lagged`.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<StatusEvent> {
        self.emitter.bus.subscribe()
    }

    /// Opens the transport and starts dispatching its events.
    ///
    /// The `connected` event is emitted once the transport reports it is
    /// ready. There is no retry: a failure is returned as is and the session
    /// stays disconnected.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyConnected` if the session is connected or
    /// connecting, and `Error::Connection` if the transport fails to open or
    /// [`disconnect`](Self::disconnect) is called before it does.
    ///
    /// Dropping the returned future leaves the session disconnected.
    pub async fn connect(&self) -> Result<(), Error> {
        let generation = {
            let mut state = self.emitter.state.write();
            if state.session() != SessionState::Disconnected {
                return Err(Error::AlreadyConnected);
            }
            state.set_session(SessionState::Connecting);
            self.generation.load(Ordering::Acquire)
        };
        // Puts the session back to `Disconnected` if this future is dropped
        // or fails before the transport is installed.
        let _pending = PendingConnect {
            state: &self.emitter.state,
            generation: &self.generation,
            started_at: generation,
        };

        // A transport closed by the remote end is still held until now.
        self.stop_dispatcher().await;
        let stale = self.transport.lock().take();
        if let Some(stale) = stale
            && let Err(e) = stale.destroy().await
        {
            tracing::debug!(error = %e, "Failed to destroy stale transport");
        }

        tracing::debug!(address = %self.config.address(), "Connecting");

        let (transport, events) = match T::connect(&self.config).await {
            Ok(opened) => opened,
            Err(e) => {
                tracing::debug!(address = %self.config.address(), error = %e, "Connect failed");
                return Err(e.into());
            }
        };

        let abandoned = {
            let mut state = self.emitter.state.write();
            if self.generation.load(Ordering::Acquire) == generation
                && state.session() == SessionState::Connecting
            {
                state.set_session(SessionState::Connected);
                self.install(transport, events);
                None
            } else {
                Some(transport)
            }
        };

        if let Some(transport) = abandoned {
            tracing::debug!(address = %self.config.address(), "Connect abandoned by disconnect");
            if let Err(e) = transport.destroy().await {
                tracing::debug!(error = %e, "Failed to destroy abandoned transport");
            }
            return Err(ConnectionError::Closed.into());
        }

        tracing::info!(address = %self.config.address(), "Receiver session opened");
        Ok(())
    }

    /// Adopts an already open transport and its event channel.
    ///
    /// This is how [`connect`](Self::connect) finishes; it is public for
    /// transports that are opened by other means.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyConnected` if the session is connected or
    /// connecting.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn attach(&self, transport: T, events: TransportEvents) -> Result<(), Error> {
        let mut state = self.emitter.state.write();
        if state.session() != SessionState::Disconnected {
            return Err(Error::AlreadyConnected);
        }
        state.set_session(SessionState::Connected);
        self.install(transport, events);
        Ok(())
    }

    /// Stores the transport and starts its dispatcher.
    ///
    /// Called with the state lock held and the session already `Connected`,
    /// so a concurrent `disconnect` sees either nothing or the whole install.
    fn install(&self, transport: T, events: TransportEvents) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        *self.transport.lock() = Some(Arc::new(transport));

        let handle = tokio::spawn(dispatch(
            events,
            generation,
            Arc::clone(&self.generation),
            self.emitter.clone(),
        ));
        if let Some(previous) = self.dispatcher.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Closes the session.
    ///
    /// Events still queued for the closed transport are discarded. The
    /// `disconnected` event is emitted once, and only if the session was
    /// connected. A [`connect`](Self::connect) still in flight is abandoned
    /// and returns `ConnectionError::Closed`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if the transport fails to tear down. The
    /// session is disconnected either way.
    pub async fn disconnect(&self) -> Result<(), Error> {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.stop_dispatcher().await;

        let transport = self.transport.lock().take();
        let result = match transport {
            Some(transport) => transport.destroy().await,
            None => Ok(()),
        };

        if self.emitter.emit_disconnected() {
            tracing::info!(address = %self.config.address(), "Receiver session closed");
        }

        result.map_err(Error::from)
    }

    async fn stop_dispatcher(&self) {
        let handle = self.dispatcher.lock().take();
        if let Some(handle) = handle {
            handle.abort();
            // Wait for the task so nothing is emitted after we return.
            let _ = handle.await;
        }
    }

    /// Sends a raw command and extracts the value from its response.
    ///
    /// `matcher` is either a literal prefix, which is stripped from the
    /// response, or a regex, whose match is returned:
    ///
    /// ```no_run
    /// # use denon_avr::{ConnectionConfig, DenonAvr, ResponseMatcher};
    /// # async fn example(avr: DenonAvr) -> denon_avr::Result<()> {
    /// let power = avr.send("PW?", "PW").await?; // "ON"
    /// let volume = avr.send("MV?", ResponseMatcher::volume()).await?; // "MV50"
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// The response line is not classified and produces no events.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConnected` without a live transport,
    /// `Error::Connection` if the exchange fails or times out, and
    /// `Error::Parse` if the response does not match.
    pub async fn send(
        &self,
        command: &str,
        matcher: impl Into<ResponseMatcher>,
    ) -> Result<String, Error> {
        let matcher = matcher.into();
        let transport = self.live_transport()?;

        let line = transport.exec(command).await?;
        tracing::trace!(command = %command, response = %line, matcher = %matcher, "Matching response");

        Ok(parse_response(&[line], &matcher)?)
    }

    /// Sends a typed command and extracts the value from its response.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub async fn send_command<C: Command>(&self, command: &C) -> Result<String, Error> {
        self.send(&command.code(), command.response_matcher()).await
    }

    fn live_transport(&self) -> Result<Arc<T>, Error> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        self.transport.lock().clone().ok_or(Error::NotConnected)
    }

    // ========== Power ==========

    /// Powers the receiver on.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a power state.
    pub async fn power_on(&self) -> Result<PowerState, Error> {
        self.set_power(PowerCommand::on()).await
    }

    /// Puts the receiver in standby.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a power state.
    pub async fn power_standby(&self) -> Result<PowerState, Error> {
        self.set_power(PowerCommand::standby()).await
    }

    /// Queries the power state.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a power state.
    pub async fn power_state(&self) -> Result<PowerState, Error> {
        self.set_power(PowerCommand::Query).await
    }

    async fn set_power(&self, command: PowerCommand) -> Result<PowerState, Error> {
        let state: PowerState = self.send_command(&command).await?.parse()?;
        self.emitter.state.write().set_power(state);
        Ok(state)
    }

    // ========== Main Zone ==========

    /// Switches the main zone on.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a zone state.
    pub async fn main_zone_on(&self) -> Result<ZoneState, Error> {
        self.set_main_zone(MainZoneCommand::on()).await
    }

    /// Switches the main zone off.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a zone state.
    pub async fn main_zone_off(&self) -> Result<ZoneState, Error> {
        self.set_main_zone(MainZoneCommand::off()).await
    }

    /// Queries the main zone state.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a zone state.
    pub async fn main_zone_state(&self) -> Result<ZoneState, Error> {
        self.set_main_zone(MainZoneCommand::Query).await
    }

    async fn set_main_zone(&self, command: MainZoneCommand) -> Result<ZoneState, Error> {
        let state: ZoneState = self.send_command(&command).await?.parse()?;
        self.emitter.state.write().set_main_zone(state);
        Ok(state)
    }

    // ========== Volume ==========

    /// Raises the master volume one step and returns the new level.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a volume.
    pub async fn volume_up(&self) -> Result<Volume, Error> {
        self.volume_command(VolumeCommand::Up).await
    }

    /// Lowers the master volume one step and returns the new level.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a volume.
    pub async fn volume_down(&self) -> Result<Volume, Error> {
        self.volume_command(VolumeCommand::Down).await
    }

    /// Sets the master volume.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a volume.
    pub async fn set_volume(&self, volume: Volume) -> Result<Volume, Error> {
        self.volume_command(VolumeCommand::Set(volume)).await
    }

    /// Sets the master volume in dB, where 0 dB is reference level.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if `db` is outside the receiver's range, or
    /// error if the command fails.
    pub async fn set_volume_db(&self, db: f32) -> Result<Volume, Error> {
        let volume = Volume::from_db(db, Volume::MASTER_ZERO_DB)?;
        self.set_volume(volume).await
    }

    /// Queries the master volume.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a volume.
    pub async fn volume(&self) -> Result<Volume, Error> {
        self.volume_command(VolumeCommand::Query).await
    }

    async fn volume_command(&self, command: VolumeCommand) -> Result<Volume, Error> {
        let reply = self.send_command(&command).await?;
        parse_volume_reply(&reply)
    }

    // ========== Mute ==========

    /// Mutes or unmutes the receiver.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a mute state.
    pub async fn set_mute(&self, state: MuteState) -> Result<MuteState, Error> {
        let reply = self.send_command(&MuteCommand::Set(state)).await?;
        Ok(reply.parse()?)
    }

    /// Queries the mute state.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the reply is not a mute state.
    pub async fn mute_state(&self) -> Result<MuteState, Error> {
        let reply = self.send_command(&MuteCommand::Query).await?;
        Ok(reply.parse()?)
    }

    // ========== Source ==========

    /// Selects an input source by its wire name (`"DVD"`, `"TUNER"`, ...).
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn select_source(&self, source: impl Into<String>) -> Result<String, Error> {
        self.send_command(&SourceCommand::select(source)).await
    }

    /// Queries the selected input source.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub async fn source(&self) -> Result<String, Error> {
        self.send_command(&SourceCommand::Query).await
    }
}

impl<T: Transport> Drop for DenonAvr<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.dispatcher.get_mut().take() {
            handle.abort();
        }
    }
}

impl<T: Transport> Subscribable for DenonAvr<T> {
    fn on<F>(&self, kind: StatusKind, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusEvent) + Send + Sync + 'static,
    {
        self.emitter.callbacks.on(kind, callback)
    }

    fn on_event<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusEvent) + Send + Sync + 'static,
    {
        self.emitter.callbacks.on_event(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.emitter.callbacks.unsubscribe(id)
    }
}

/// Volume replies are the code followed by the level (`MV505`).
fn parse_volume_reply(reply: &str) -> Result<Volume, Error> {
    let level = reply.get(2..).ok_or_else(|| ParseError::InvalidValue {
        field: "volume".to_string(),
        message: format!("reply {reply:?} carries no level"),
    })?;
    Ok(Volume::from_ascii(level)?)
}

/// Fan-out of status events to state, callbacks and the broadcast channel.
#[derive(Debug, Clone, Default)]
struct Emitter {
    state: Arc<RwLock<ReceiverState>>,
    callbacks: Arc<CallbackRegistry>,
    bus: EventBus,
}

impl Emitter {
    fn emit(&self, event: StatusEvent) {
        self.state.write().apply(&event);
        self.callbacks.dispatch(&event);
        self.bus.publish(event);
    }

    /// Moves the session to `Disconnected`, emitting `disconnected` only if
    /// it was connected.
    ///
    /// The state transition decides, so a remote close racing a local
    /// disconnect still yields a single event, and cancelling a pending
    /// connect yields none.
    fn emit_disconnected(&self) -> bool {
        let was_connected = {
            let mut state = self.state.write();
            let was_connected = state.is_connected();
            state.set_session(SessionState::Disconnected);
            was_connected
        };
        if was_connected {
            self.callbacks.dispatch(&StatusEvent::Disconnected);
            self.bus.publish(StatusEvent::Disconnected);
        }
        was_connected
    }
}

/// Resets a `Connecting` session when its connect ends without installing.
///
/// A successful install or a `disconnect` moves the generation, after which
/// the state belongs to someone else and is left alone.
struct PendingConnect<'a> {
    state: &'a RwLock<ReceiverState>,
    generation: &'a AtomicU64,
    started_at: u64,
}

impl Drop for PendingConnect<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write();
        if self.generation.load(Ordering::Acquire) == self.started_at
            && state.session() == SessionState::Connecting
        {
            state.set_session(SessionState::Disconnected);
        }
    }
}

/// Consumes one transport's events until it closes or the session moves on.
async fn dispatch(
    mut events: TransportEvents,
    generation: u64,
    current: Arc<AtomicU64>,
    emitter: Emitter,
) {
    while let Some(event) = events.recv().await {
        if current.load(Ordering::Acquire) != generation {
            tracing::trace!(generation, "Dropping event from stale session");
            break;
        }

        match event {
            TransportEvent::Ready => emitter.emit(StatusEvent::Connected),
            TransportEvent::Data(line) => {
                tracing::trace!(line = %String::from_utf8_lossy(&line), "Status line");
                for status in classify(&line) {
                    emitter.emit(status);
                }
            }
            TransportEvent::Timeout => {
                tracing::debug!("Transport reported a command timeout");
            }
            TransportEvent::Close => {
                emitter.emit_disconnected();
                tracing::info!("Receiver closed the connection");
                break;
            }
        }
    }
}
