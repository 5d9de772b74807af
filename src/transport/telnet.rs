// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telnet transport over TCP.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::codec::{IAC, LineSplitter, TelnetFilter};
use super::{EVENT_CHANNEL_CAPACITY, Transport, TransportEvent, TransportEvents};
use crate::config::ConnectionConfig;
use crate::error::ConnectionError;

type ResponseSlot = Arc<Mutex<Option<oneshot::Sender<String>>>>;
type SharedWriter = Arc<tokio::sync::Mutex<OwnedWriteHalf>>;

/// Line-oriented telnet client for a receiver's control port.
///
/// A background task reads the socket, strips telnet negotiation (every
/// option is refused), splits input on the configured input record separator
/// and forwards each line as [`TransportEvent::Data`]. While an
/// [`exec`](Transport::exec) is waiting, the next line goes to it instead.
///
/// Commands are serialized: a second `exec` waits until the first has its
/// response or fails.
///
/// # Examples
///
/// ```no_run
/// use denon_avr::ConnectionConfig;
/// use denon_avr::transport::{TelnetTransport, Transport, TransportEvent};
///
/// # async fn example() -> Result<(), denon_avr::error::ConnectionError> {
/// let config = ConnectionConfig::new("192.168.1.9");
/// let (transport, mut events) = TelnetTransport::connect(&config).await?;
///
/// let power = transport.exec("PW?").await?;
/// println!("power: {power}");
///
/// while let Some(event) = events.recv().await {
///     if let TransportEvent::Data(line) = event {
///         println!("{}", String::from_utf8_lossy(&line));
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TelnetTransport {
    address: String,
    writer: SharedWriter,
    response_slot: ResponseSlot,
    exec_lock: tokio::sync::Mutex<()>,
    events: mpsc::Sender<TransportEvent>,
    reader: Mutex<Option<JoinHandle<()>>>,
    closed: Arc<AtomicBool>,
    ors: String,
    send_timeout: Duration,
    exec_timeout: Duration,
}

impl TelnetTransport {
    /// Returns the `host:port` this transport is connected to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns `true` once the connection has closed or been destroyed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn clear_response_slot(&self) {
        self.response_slot.lock().take();
    }
}

impl Transport for TelnetTransport {
    async fn connect(
        config: &ConnectionConfig,
    ) -> Result<(Self, TransportEvents), ConnectionError> {
        config.validate()?;
        let address = config.address();

        tracing::debug!(address = %address, "Connecting to receiver");

        let stream = tokio::time::timeout(
            config.connect_timeout(),
            TcpStream::connect((config.host(), config.port())),
        )
        .await
        .map_err(|_| ConnectionError::Timeout(millis(config.connect_timeout())))??;

        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!(error = %e, "Failed to set TCP_NODELAY");
        }

        let (mut read_half, write_half) = stream.into_split();

        let initial = if config.negotiation_mandatory() {
            await_negotiation(&mut read_half, config.send_timeout()).await?
        } else {
            Vec::new()
        };

        let writer: SharedWriter = Arc::new(tokio::sync::Mutex::new(write_half));
        let response_slot: ResponseSlot = Arc::new(Mutex::new(None));
        let closed = Arc::new(AtomicBool::new(false));
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        // Queued before the reader starts so Ready is always first.
        events_tx
            .send(TransportEvent::Ready)
            .await
            .map_err(|_| ConnectionError::Closed)?;

        let reader = ReadLoop {
            reader: read_half,
            filter: TelnetFilter::new(),
            splitter: LineSplitter::new(config.irs().as_bytes()),
            prompt: config.shell_prompt().as_bytes().to_vec(),
            writer: Arc::clone(&writer),
            response_slot: Arc::clone(&response_slot),
            events: events_tx.clone(),
            closed: Arc::clone(&closed),
        };
        let handle = tokio::spawn(reader.run(initial));

        tracing::info!(address = %address, "Telnet session established");

        Ok((
            Self {
                address,
                writer,
                response_slot,
                exec_lock: tokio::sync::Mutex::new(()),
                events: events_tx,
                reader: Mutex::new(Some(handle)),
                closed,
                ors: config.ors().to_string(),
                send_timeout: config.send_timeout(),
                exec_timeout: config.exec_timeout(),
            },
            events_rx,
        ))
    }

    async fn exec(&self, command: &str) -> Result<String, ConnectionError> {
        let _guard = self.exec_lock.lock().await;

        if self.is_closed() {
            return Err(ConnectionError::Closed);
        }

        // The slot is armed before writing so a fast reply cannot slip past.
        let (tx, rx) = oneshot::channel();
        *self.response_slot.lock() = Some(tx);

        tracing::debug!(address = %self.address, command = %command, "Sending command");

        let payload = format!("{command}{}", self.ors);
        let write = async {
            let mut writer = self.writer.lock().await;
            writer.write_all(payload.as_bytes()).await?;
            writer.flush().await
        };

        match tokio::time::timeout(self.send_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.clear_response_slot();
                return Err(e.into());
            }
            Err(_) => {
                self.clear_response_slot();
                return Err(ConnectionError::Timeout(millis(self.send_timeout)));
            }
        }

        match tokio::time::timeout(self.exec_timeout, rx).await {
            Ok(Ok(line)) => {
                tracing::debug!(command = %command, response = %line, "Received response");
                Ok(line)
            }
            Ok(Err(_)) => Err(ConnectionError::Closed),
            Err(_) => {
                self.clear_response_slot();
                tracing::warn!(command = %command, "No response before exec timeout");
                let _ = self.events.try_send(TransportEvent::Timeout);
                Err(ConnectionError::Timeout(millis(self.exec_timeout)))
            }
        }
    }

    async fn destroy(&self) -> Result<(), ConnectionError> {
        let Some(handle) = self.reader.lock().take() else {
            return Ok(());
        };

        let reader_running = !handle.is_finished();
        handle.abort();
        self.closed.store(true, Ordering::Release);
        self.clear_response_slot();

        if let Err(e) = self.writer.lock().await.shutdown().await {
            tracing::debug!(error = %e, "Socket shutdown failed");
        }

        if reader_running {
            let _ = self.events.try_send(TransportEvent::Close);
        }

        tracing::info!(address = %self.address, "Telnet session closed");
        Ok(())
    }
}

impl Drop for TelnetTransport {
    fn drop(&mut self) {
        if let Some(handle) = self.reader.get_mut().take() {
            handle.abort();
        }
    }
}

/// Reads the server's opening bytes and checks they start a negotiation.
async fn await_negotiation(
    reader: &mut OwnedReadHalf,
    timeout: Duration,
) -> Result<Vec<u8>, ConnectionError> {
    let mut buf = [0u8; 512];
    let n = tokio::time::timeout(timeout, reader.read(&mut buf))
        .await
        .map_err(|_| {
            ConnectionError::NegotiationFailed("server sent nothing before timeout".to_string())
        })??;

    match buf[..n].first() {
        None => Err(ConnectionError::Closed),
        Some(&IAC) => Ok(buf[..n].to_vec()),
        Some(_) => Err(ConnectionError::NegotiationFailed(
            "server did not open with a telnet command".to_string(),
        )),
    }
}

/// State owned by the background read task.
struct ReadLoop {
    reader: OwnedReadHalf,
    filter: TelnetFilter,
    splitter: LineSplitter,
    prompt: Vec<u8>,
    writer: SharedWriter,
    response_slot: ResponseSlot,
    events: mpsc::Sender<TransportEvent>,
    closed: Arc<AtomicBool>,
}

impl ReadLoop {
    async fn run(mut self, initial: Vec<u8>) {
        if !initial.is_empty() {
            self.process(&initial).await;
        }

        let mut buf = vec![0u8; 1024];
        loop {
            match self.reader.read(&mut buf).await {
                Ok(0) => {
                    tracing::info!("Connection closed by receiver");
                    break;
                }
                Ok(n) => self.process(&buf[..n]).await,
                Err(e) => {
                    tracing::warn!(error = %e, "Read from receiver failed");
                    break;
                }
            }
        }

        self.closed.store(true, Ordering::Release);
        self.response_slot.lock().take();
        let _ = self.events.send(TransportEvent::Close).await;
    }

    async fn process(&mut self, chunk: &[u8]) {
        let filtered = self.filter.feed(chunk);

        if !filtered.replies.is_empty() {
            tracing::trace!(bytes = filtered.replies.len(), "Refusing telnet options");
            let mut writer = self.writer.lock().await;
            if let Err(e) = writer.write_all(&filtered.replies).await {
                tracing::warn!(error = %e, "Failed to answer telnet negotiation");
            }
        }

        for line in self.splitter.push(&filtered.data) {
            self.dispatch_line(line).await;
        }
    }

    async fn dispatch_line(&mut self, line: Vec<u8>) {
        if line.is_empty() || (!self.prompt.is_empty() && line == self.prompt) {
            return;
        }

        tracing::trace!(line = %String::from_utf8_lossy(&line), "Received line");

        let waiter = self.response_slot.lock().take();
        // A failed send means the exec gave up; the line is then a broadcast.
        if let Some(waiter) = waiter
            && waiter
                .send(String::from_utf8_lossy(&line).into_owned())
                .is_ok()
        {
            return;
        }

        // A dropped receiver only means nobody listens; keep serving exec.
        let _ = self.events.send(TransportEvent::Data(line)).await;
    }
}

/// Converts a timeout to whole milliseconds for error reporting.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, ConnectionConfig) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ConnectionConfig::builder(addr.ip().to_string())
            .port(addr.port())
            .exec_timeout(Duration::from_millis(300))
            .build()
            .unwrap();
        (listener, config)
    }

    #[tokio::test]
    async fn ready_is_first_event() {
        let (listener, config) = listener().await;
        let server = tokio::spawn(async move { listener.accept().await.unwrap().0 });

        let (transport, mut events) = TelnetTransport::connect(&config).await.unwrap();
        let _socket = server.await.unwrap();

        assert_eq!(events.recv().await, Some(TransportEvent::Ready));
        transport.destroy().await.unwrap();
    }

    #[tokio::test]
    async fn connect_refused() {
        let (listener, config) = listener().await;
        drop(listener);

        let result = TelnetTransport::connect(&config).await;
        assert!(matches!(result, Err(ConnectionError::Io(_))));
    }

    #[tokio::test]
    async fn negotiation_mandatory_rejects_plain_server() {
        let (listener, config) = listener().await;
        let config = ConnectionConfig::builder(config.host())
            .port(config.port())
            .negotiation_mandatory(true)
            .send_timeout(Duration::from_millis(500))
            .build()
            .unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"PWON\r").await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
        });

        let result = TelnetTransport::connect(&config).await;
        assert!(matches!(result, Err(ConnectionError::NegotiationFailed(_))));
    }

    #[tokio::test]
    async fn exec_times_out_without_response() {
        let (listener, config) = listener().await;
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let (transport, _events) = TelnetTransport::connect(&config).await.unwrap();
        let result = transport.exec("PW?").await;
        assert!(matches!(result, Err(ConnectionError::Timeout(300))));
    }

    #[tokio::test]
    async fn destroy_is_idempotent() {
        let (listener, config) = listener().await;
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
        });

        let (transport, _events) = TelnetTransport::connect(&config).await.unwrap();
        transport.destroy().await.unwrap();
        transport.destroy().await.unwrap();
        assert!(transport.is_closed());
        assert!(matches!(
            transport.exec("PW?").await,
            Err(ConnectionError::Closed)
        ));
    }
}
