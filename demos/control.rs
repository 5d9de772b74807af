// SPDX-License-Identifier: MPL-2.0

//! Sends a single command to a receiver and prints the result.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example control -- <host> <action> [value]
//! ```
//!
//! Actions: `power`, `on`, `standby`, `zone-on`, `zone-off`, `volume`,
//! `volume-up`, `volume-down`, `volume-db <dB>`, `mute`, `unmute`,
//! `source [name]`, `raw <command> <prefix>`.
//!
//! # Examples
//!
//! ```bash
//! cargo run --example control -- 192.168.1.9 power
//! cargo run --example control -- 192.168.1.9 volume-db -35.5
//! cargo run --example control -- 192.168.1.9 source TUNER
//! cargo run --example control -- 192.168.1.9 raw SV? SV
//! ```

use std::env;
use std::time::Duration;

use denon_avr::{ConnectionConfig, DenonAvr, MuteState, Volume};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let config = ConnectionConfig::builder(&args[1])
        .exec_timeout(Duration::from_secs(2))
        .build()?;
    let avr = DenonAvr::new(config);
    avr.connect().await?;

    let value = args.get(3).map(String::as_str);
    let extra = args.get(4).map(String::as_str);
    let result = run(&avr, &args[2], value, extra).await;

    avr.disconnect().await?;

    match result {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(
    avr: &DenonAvr,
    action: &str,
    value: Option<&str>,
    extra: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match action {
        "power" => avr.power_state().await?.to_string(),
        "on" => avr.power_on().await?.to_string(),
        "standby" => avr.power_standby().await?.to_string(),
        "zone-on" => avr.main_zone_on().await?.to_string(),
        "zone-off" => avr.main_zone_off().await?.to_string(),
        "volume" => describe(avr.volume().await?),
        "volume-up" => describe(avr.volume_up().await?),
        "volume-down" => describe(avr.volume_down().await?),
        "volume-db" => {
            let db: f32 = value.ok_or("volume-db needs a value")?.parse()?;
            describe(avr.set_volume_db(db).await?)
        }
        "mute" => avr.set_mute(MuteState::On).await?.to_string(),
        "unmute" => avr.set_mute(MuteState::Off).await?.to_string(),
        "source" => match value {
            Some(name) => avr.select_source(name).await?,
            None => avr.source().await?,
        },
        "raw" => {
            let command = value.ok_or("raw needs a command")?;
            let prefix = extra.ok_or("raw needs a response prefix")?;
            avr.send(command, prefix).await?
        }
        other => return Err(format!("unknown action: {other}").into()),
    };
    Ok(output)
}

fn describe(volume: Volume) -> String {
    format!("{volume} ({:.1} dB)", volume.to_db(Volume::MASTER_ZERO_DB))
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <host> <action> [value]");
    eprintln!();
    eprintln!("Actions:");
    eprintln!("  power | on | standby | zone-on | zone-off");
    eprintln!("  volume | volume-up | volume-down | volume-db <dB>");
    eprintln!("  mute | unmute | source [name] | raw <command> <prefix>");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {program} 192.168.1.9 power");
    eprintln!("  {program} 192.168.1.9 volume-db -35.5");
}
