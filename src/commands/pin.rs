// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::pin::{self, PinOutcome};
use crate::utils::{maybe_print_json, now, required_arg};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("verify", sub)) => verify(conn, required_arg(sub, "pin")?)?,
        Some(("change", sub)) => {
            let current = required_arg(sub, "current")?;
            let new_pin = required_arg(sub, "new")?;
            if new_pin != required_arg(sub, "confirm")? {
                bail!("New PIN and confirmation do not match");
            }
            pin::change_pin(conn, current, new_pin, now())?;
            if pin::is_weak_pin(new_pin) {
                println!("Warning: {} is easy to guess; consider another PIN", new_pin);
            }
            println!("PIN changed");
        }
        Some(("status", sub)) => {
            let status = pin::status(conn, now())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &status)? {
                println!(
                    "PIN gate: {}",
                    if status.is_enabled { "enabled" } else { "disabled" }
                );
                println!(
                    "PIN: {}",
                    if status.custom_pin { "custom" } else { "factory default" }
                );
                println!("Failed attempts: {}", status.failed_attempts);
                if let Some(until) = status.locked_until {
                    println!("Locked until {}", until.format("%Y-%m-%d %H:%M:%S"));
                }
            }
        }
        Some(("enable", _)) => {
            pin::set_enabled(conn, true, now())?;
            println!("PIN gate enabled");
        }
        Some(("disable", _)) => {
            pin::set_enabled(conn, false, now())?;
            println!("PIN gate disabled");
        }
        _ => {}
    }
    Ok(())
}

fn verify(conn: &Connection, entered: &str) -> Result<()> {
    match pin::verify(conn, entered, now())? {
        PinOutcome::Granted => {
            println!("Access granted");
            Ok(())
        }
        PinOutcome::Denied { remaining } => {
            bail!("Incorrect PIN, {} attempt(s) remaining", remaining)
        }
        PinOutcome::LockedOut { until } => bail!(
            "Incorrect PIN, too many attempts; locked until {}",
            until.format("%H:%M:%S")
        ),
        PinOutcome::Locked { until } => {
            bail!("PIN entry is locked until {}", until.format("%H:%M:%S"))
        }
    }
}
