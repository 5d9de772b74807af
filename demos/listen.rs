// SPDX-License-Identifier: MPL-2.0

//! Prints status events broadcast by a receiver.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example listen -- <host> [--raw]
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example listen -- 192.168.1.9 --raw
//! ```
//!
//! Switch the main zone on or off with the remote and watch the events
//! arrive. Stop with Ctrl+C.

use std::env;

use denon_avr::subscription::Subscribable;
use denon_avr::{ConnectionConfig, DenonAvr, StatusEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <host> [--raw]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example listen -- 192.168.1.9 --raw");
        std::process::exit(1);
    }

    let host = &args[1];
    let show_raw = args.iter().any(|a| a == "--raw");

    let avr = DenonAvr::new(ConnectionConfig::new(host));

    avr.on_main_zone_on(|| println!("mainZoneOn"));
    avr.on_main_zone_off(|| println!("mainZoneOff"));
    avr.on_power_on(|| println!("powerOn"));
    avr.on_power_standby(|| println!("powerStandby"));
    if show_raw {
        avr.on_raw(|line| println!("raw: {}", String::from_utf8_lossy(line)));
    }

    let mut events = avr.events();

    println!("Connecting to {host}...");
    avr.connect().await?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(StatusEvent::Connected) => println!("Connected, listening..."),
                Ok(StatusEvent::Disconnected) => {
                    println!("Receiver closed the connection");
                    break;
                }
                Ok(_) => {}
                Err(e) => eprintln!("Event stream: {e}"),
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                avr.disconnect().await?;
                break;
            }
        }
    }

    Ok(())
}
