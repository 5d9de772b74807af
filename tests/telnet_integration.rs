// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests against a fake receiver on a local TCP socket.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use denon_avr::subscription::Subscribable;
use denon_avr::{
    ConnectionConfig, ConnectionError, DenonAvr, Error, PowerState, StatusEvent, StatusKind,
    Volume, ZoneState,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::task::JoinHandle;

const IAC: u8 = 255;
const DO: u8 = 253;
const WONT: u8 = 252;
const ECHO: u8 = 1;

// ============================================================================
// Fake receiver
// ============================================================================

async fn bind() -> (TcpListener, ConnectionConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ConnectionConfig::builder(addr.ip().to_string())
        .port(addr.port())
        .exec_timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    (listener, config)
}

/// What the fake receiver answers to each command.
fn reply_to(command: &str) -> Option<&'static str> {
    match command {
        "PW?" | "PWON" => Some("PWON\r"),
        "PWSTANDBY" => Some("PWSTANDBY\r"),
        "ZM?" | "ZMON" => Some("ZMON\r"),
        "ZMOFF" => Some("ZMOFF\r"),
        "MV?" => Some("MV505\r"),
        "MVUP" => Some("MV51\r"),
        "MU?" => Some("MUOFF\r"),
        "SI?" => Some("SIDVD\r"),
        _ => None,
    }
}

/// Sends `greeting`, then answers CR-terminated commands until the client
/// goes away.
async fn serve(mut socket: TcpStream, greeting: &[u8]) {
    socket.write_all(greeting).await.unwrap();

    let mut buf = [0u8; 256];
    let mut pending = Vec::new();
    loop {
        let n = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        pending.extend_from_slice(&buf[..n]);

        while let Some(end) = pending.iter().position(|&b| b == b'\r') {
            let line: Vec<u8> = pending.drain(..=end).collect();
            let command = String::from_utf8_lossy(&line[..end]).into_owned();
            if let Some(reply) = reply_to(&command) {
                socket.write_all(reply.as_bytes()).await.unwrap();
            }
        }
    }
}

fn spawn_receiver(listener: TcpListener, greeting: &'static [u8]) -> JoinHandle<()> {
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        serve(socket, greeting).await;
    })
}

async fn next(events: &mut broadcast::Receiver<StatusEvent>) -> StatusEvent {
    tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("no event within 2s")
        .unwrap()
}

// ============================================================================
// Status events
// ============================================================================

mod status_events {
    use super::*;

    #[tokio::test]
    async fn broadcast_lines_are_classified_in_order() {
        let (listener, config) = bind().await;
        spawn_receiver(listener, b"ZMON\rMV50\r");

        let avr = DenonAvr::new(config);
        let mut events = avr.events();
        avr.connect().await.unwrap();

        assert_eq!(next(&mut events).await, StatusEvent::Connected);
        assert_eq!(next(&mut events).await, StatusEvent::Raw(b"ZMON".to_vec()));
        assert_eq!(next(&mut events).await, StatusEvent::MainZoneOn);
        assert_eq!(next(&mut events).await, StatusEvent::Raw(b"MV50".to_vec()));

        avr.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn main_zone_subscribers_by_name() {
        let (listener, config) = bind().await;
        spawn_receiver(listener, b"ZMON\r");

        let avr = DenonAvr::new(config);
        let on = Arc::new(AtomicU32::new(0));
        let off = Arc::new(AtomicU32::new(0));

        let on_clone = Arc::clone(&on);
        avr.on("mainZoneOn".parse::<StatusKind>().unwrap(), move |_| {
            on_clone.fetch_add(1, Ordering::SeqCst);
        });
        let off_clone = Arc::clone(&off);
        avr.on("mainZoneOff".parse::<StatusKind>().unwrap(), move |_| {
            off_clone.fetch_add(1, Ordering::SeqCst);
        });

        let mut events = avr.events();
        avr.connect().await.unwrap();
        while next(&mut events).await != StatusEvent::MainZoneOn {}

        assert_eq!(on.load(Ordering::SeqCst), 1);
        assert_eq!(off.load(Ordering::SeqCst), 0);
        assert_eq!(avr.state().main_zone(), Some(ZoneState::On));
    }

    #[tokio::test]
    async fn telnet_options_are_refused() {
        let (listener, config) = bind().await;
        let config = ConnectionConfig::builder(config.host())
            .port(config.port())
            .negotiation_mandatory(true)
            .build()
            .unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(&[IAC, DO, ECHO]).await.unwrap();

            let mut answer = [0u8; 3];
            socket.read_exact(&mut answer).await.unwrap();
            assert_eq!(answer, [IAC, WONT, ECHO]);

            socket.write_all(b"PWSTANDBY\r").await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
        });

        let avr = DenonAvr::new(config);
        let mut events = avr.events();
        avr.connect().await.unwrap();

        assert_eq!(next(&mut events).await, StatusEvent::Connected);
        assert_eq!(
            next(&mut events).await,
            StatusEvent::Raw(b"PWSTANDBY".to_vec())
        );
        assert_eq!(next(&mut events).await, StatusEvent::PowerStandby);

        server.await.unwrap();
    }

    #[tokio::test]
    async fn remote_close_emits_disconnected() {
        let (listener, config) = bind().await;
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"PWON\r").await.unwrap();
        });

        let avr = DenonAvr::new(config);
        let mut events = avr.events();
        avr.connect().await.unwrap();

        assert_eq!(next(&mut events).await, StatusEvent::Connected);
        assert_eq!(next(&mut events).await, StatusEvent::Raw(b"PWON".to_vec()));
        assert_eq!(next(&mut events).await, StatusEvent::PowerOn);
        assert_eq!(next(&mut events).await, StatusEvent::Disconnected);
        assert!(!avr.is_connected());
    }

    #[tokio::test]
    async fn disconnect_emits_once_and_silences_session() {
        let (listener, config) = bind().await;
        spawn_receiver(listener, b"");

        let avr = DenonAvr::new(config);
        let mut events = avr.events();
        avr.connect().await.unwrap();
        assert_eq!(next(&mut events).await, StatusEvent::Connected);

        avr.disconnect().await.unwrap();
        avr.disconnect().await.unwrap();
        assert_eq!(next(&mut events).await, StatusEvent::Disconnected);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
    }
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test]
    async fn send_extracts_prefix_and_pattern_values() {
        let (listener, config) = bind().await;
        spawn_receiver(listener, b"");

        let avr = DenonAvr::new(config);
        avr.connect().await.unwrap();

        assert_eq!(avr.send("PW?", "PW").await.unwrap(), "ON");
        let volume = avr
            .send("MV?", denon_avr::ResponseMatcher::volume())
            .await
            .unwrap();
        assert_eq!(volume, "MV505");
    }

    #[tokio::test]
    async fn responses_produce_no_events() {
        let (listener, config) = bind().await;
        spawn_receiver(listener, b"");

        let avr = DenonAvr::new(config);
        let mut events = avr.events();
        avr.connect().await.unwrap();
        assert_eq!(next(&mut events).await, StatusEvent::Connected);

        avr.send("ZM?", "ZM").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(events.try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[tokio::test]
    async fn mismatched_response_is_parse_error() {
        let (listener, config) = bind().await;
        spawn_receiver(listener, b"");

        let avr = DenonAvr::new(config);
        avr.connect().await.unwrap();

        let err = avr.send("SI?", "PW").await.unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[tokio::test]
    async fn typed_helpers() {
        let (listener, config) = bind().await;
        spawn_receiver(listener, b"");

        let avr = DenonAvr::new(config);
        avr.connect().await.unwrap();

        assert_eq!(avr.power_on().await.unwrap(), PowerState::On);
        assert_eq!(avr.main_zone_off().await.unwrap(), ZoneState::Off);

        let volume = avr.volume().await.unwrap();
        assert!((volume.to_db(Volume::MASTER_ZERO_DB) - (-29.5)).abs() < f32::EPSILON);
        assert_eq!(avr.volume_up().await.unwrap(), Volume::new(51).unwrap());

        assert!(!avr.mute_state().await.unwrap().is_muted());
        assert_eq!(avr.source().await.unwrap(), "DVD");

        assert_eq!(avr.state().power(), Some(PowerState::On));
    }

    #[tokio::test]
    async fn unanswered_command_times_out() {
        let (listener, config) = bind().await;
        spawn_receiver(listener, b"");

        let avr = DenonAvr::new(config);
        avr.connect().await.unwrap();

        let err = avr.send("NOPE", "NO").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Connection(ConnectionError::Timeout(300))
        ));

        // The session stays usable.
        assert_eq!(avr.send("PW?", "PW").await.unwrap(), "ON");
    }

    #[tokio::test]
    async fn connect_refused_is_connection_error() {
        let (listener, config) = bind().await;
        drop(listener);

        let avr = DenonAvr::new(config);
        let err = avr.connect().await.unwrap_err();
        assert!(matches!(err, Error::Connection(ConnectionError::Io(_))));
        assert!(!avr.is_connected());
    }
}
