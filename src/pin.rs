// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! PIN gate with failed-attempt lockout.
//!
//! The PIN is kept and compared in plaintext; this gate keeps casual hands off
//! the till, nothing more.

use crate::error::{StoreError, StoreResult};
use crate::models::PinSettings;
use crate::store::{self, PIN_SETTINGS_KEY};
use chrono::{Duration, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

/// Accepted until a PIN has been saved.
pub const DEFAULT_PIN: &str = "4321";
pub const MAX_FAILED_ATTEMPTS: u32 = 3;
pub const LOCKOUT_MINUTES: i64 = 5;

static PIN_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("PIN pattern compiles"));

const COMMON_PINS: [&str; 11] = [
    "1234", "1111", "0000", "2222", "3333", "4444", "5555", "6666", "7777", "8888", "9999",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum PinOutcome {
    Granted,
    Denied { remaining: u32 },
    /// This attempt used up the last try.
    LockedOut { until: NaiveDateTime },
    /// Rejected without being judged; the gate was already locked.
    Locked { until: NaiveDateTime },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinStatus {
    pub custom_pin: bool,
    pub is_enabled: bool,
    pub failed_attempts: u32,
    pub locked_until: Option<NaiveDateTime>,
}

pub fn load(conn: &Connection) -> StoreResult<Option<PinSettings>> {
    store::get::<PinSettings>(conn, PIN_SETTINGS_KEY)
}

fn active_lock(settings: &PinSettings, now: NaiveDateTime) -> Option<NaiveDateTime> {
    settings.lock_until.filter(|until| now < *until)
}

fn fresh_settings(pin: &str, now: NaiveDateTime) -> PinSettings {
    PinSettings {
        pin: pin.to_string(),
        is_enabled: true,
        created_at: now,
        last_modified: now,
        failed_attempts: 0,
        last_attempt: None,
        lock_until: None,
        is_locked: false,
    }
}

pub fn status(conn: &Connection, now: NaiveDateTime) -> StoreResult<PinStatus> {
    Ok(match load(conn)? {
        Some(s) => PinStatus {
            custom_pin: true,
            is_enabled: s.is_enabled,
            failed_attempts: s.failed_attempts,
            locked_until: active_lock(&s, now),
        },
        None => PinStatus {
            custom_pin: false,
            is_enabled: true,
            failed_attempts: 0,
            locked_until: None,
        },
    })
}

/// Checks `entered` against the stored PIN and updates the lockout bookkeeping.
pub fn verify(conn: &Connection, entered: &str, now: NaiveDateTime) -> StoreResult<PinOutcome> {
    let stored = load(conn)?;
    if let Some(until) = stored.as_ref().and_then(|s| active_lock(s, now)) {
        return Ok(PinOutcome::Locked { until });
    }
    if stored.as_ref().is_some_and(|s| !s.is_enabled) {
        return Ok(PinOutcome::Granted);
    }

    let expected = stored.as_ref().map(|s| s.pin.as_str()).unwrap_or(DEFAULT_PIN);
    if entered == expected {
        if let Some(mut s) = stored {
            s.failed_attempts = 0;
            s.last_attempt = Some(now);
            s.lock_until = None;
            s.is_locked = false;
            store::put(conn, &s)?;
        }
        return Ok(PinOutcome::Granted);
    }

    let mut s = stored.unwrap_or_else(|| fresh_settings(DEFAULT_PIN, now));
    if s.lock_until.is_some() {
        // the previous lockout has lapsed; start a new window
        s.failed_attempts = 0;
        s.lock_until = None;
        s.is_locked = false;
    }
    s.failed_attempts += 1;
    s.last_attempt = Some(now);
    s.last_modified = now;

    let outcome = if s.failed_attempts >= MAX_FAILED_ATTEMPTS {
        let until = now + Duration::minutes(LOCKOUT_MINUTES);
        s.lock_until = Some(until);
        s.is_locked = true;
        warn!(attempts = s.failed_attempts, %until, "PIN entry locked");
        PinOutcome::LockedOut { until }
    } else {
        warn!(attempts = s.failed_attempts, "incorrect PIN");
        PinOutcome::Denied {
            remaining: MAX_FAILED_ATTEMPTS - s.failed_attempts,
        }
    };
    store::put(conn, &s)?;
    Ok(outcome)
}

pub fn validate_format(pin: &str) -> StoreResult<()> {
    if PIN_FORMAT.is_match(pin) {
        Ok(())
    } else {
        Err(StoreError::Validation("PIN must be exactly 4 digits".into()))
    }
}

/// Replaces the PIN after checking the current one. Clears any lockout.
pub fn change_pin(
    conn: &Connection,
    current: &str,
    new_pin: &str,
    now: NaiveDateTime,
) -> StoreResult<PinSettings> {
    let stored = load(conn)?;
    if let Some(until) = stored.as_ref().and_then(|s| active_lock(s, now)) {
        return Err(StoreError::Validation(format!(
            "PIN entry is locked until {}",
            until.format("%H:%M")
        )));
    }
    let expected = stored.as_ref().map(|s| s.pin.as_str()).unwrap_or(DEFAULT_PIN);
    if current != expected {
        return Err(StoreError::Validation("current PIN is incorrect".into()));
    }
    validate_format(new_pin)?;

    let mut settings = match stored {
        Some(s) => PinSettings {
            pin: new_pin.to_string(),
            is_enabled: true,
            last_modified: now,
            failed_attempts: 0,
            lock_until: None,
            is_locked: false,
            ..s
        },
        None => fresh_settings(new_pin, now),
    };
    settings.last_attempt = Some(now);
    store::put(conn, &settings)?;
    info!("PIN changed");
    Ok(settings)
}

pub fn set_enabled(conn: &Connection, enabled: bool, now: NaiveDateTime) -> StoreResult<PinSettings> {
    let mut settings = load(conn)?.unwrap_or_else(|| fresh_settings(DEFAULT_PIN, now));
    settings.is_enabled = enabled;
    settings.last_modified = now;
    store::put(conn, &settings)?;
    Ok(settings)
}

/// Easily guessed PINs: runs like 1234 or 9876, four of a kind, and the usual suspects.
pub fn is_weak_pin(pin: &str) -> bool {
    if "0123456789".contains(pin) || "9876543210".contains(pin) {
        return true;
    }
    let mut chars = pin.chars();
    if let Some(first) = chars.next() {
        if pin.len() > 1 && chars.all(|c| c == first) {
            return true;
        }
    }
    COMMON_PINS.contains(&pin)
}
