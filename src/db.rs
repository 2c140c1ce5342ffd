// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{StoreError, StoreResult};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.saloonlite", "SaloonLite", "saloonlite"));

/// Environment variable overriding the database location.
pub const DB_ENV: &str = "SALOONLITE_DB";

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("saloonlite.sqlite"))
}

/// `--db` flag first, then `SALOONLITE_DB`, then the platform data dir.
pub fn resolve_path(explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(p) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    db_path()
}

pub fn open_or_init(explicit: Option<&str>) -> Result<Connection> {
    let path = resolve_path(explicit)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let conn = open_at(&path)?;
    Ok(conn)
}

/// Opens (creating if needed) the store at `path`.
pub fn open_at(path: &Path) -> StoreResult<Connection> {
    let unavailable = |source: rusqlite::Error| StoreError::Unavailable {
        path: path.to_path_buf(),
        source,
    };
    let conn = Connection::open(path).map_err(unavailable)?;
    let mode: String = conn
        .pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))
        .map_err(unavailable)?;
    debug!(journal_mode = %mode, "pragma applied");
    init_schema(&conn).map_err(unavailable)?;
    info!(path = %path.display(), "store opened");
    Ok(conn)
}

pub fn open_in_memory() -> StoreResult<Connection> {
    let path = PathBuf::from(":memory:");
    let conn = Connection::open_in_memory().map_err(|source| StoreError::Unavailable {
        path: path.clone(),
        source,
    })?;
    init_schema(&conn).map_err(|source| StoreError::Unavailable { path, source })?;
    Ok(conn)
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS services(
        key TEXT PRIMARY KEY,
        body TEXT NOT NULL,
        is_active TEXT NOT NULL DEFAULT '1'
    );
    CREATE INDEX IF NOT EXISTS idx_services_active ON services(is_active);

    -- sales and expenses; never updated once written
    CREATE TABLE IF NOT EXISTS transactions(
        key TEXT PRIMARY KEY,
        body TEXT NOT NULL,
        datetime TEXT NOT NULL,
        date_key TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('sale','expense'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_datetime ON transactions(datetime);
    CREATE INDEX IF NOT EXISTS idx_transactions_date_key ON transactions(date_key);
    CREATE INDEX IF NOT EXISTS idx_transactions_kind ON transactions(kind);

    -- one row per YYYY-MM-DD
    CREATE TABLE IF NOT EXISTS summaries(
        key TEXT PRIMARY KEY,
        body TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS preferences(
        key TEXT PRIMARY KEY,
        body TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        body TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS pin_settings(
        key TEXT PRIMARY KEY,
        body TEXT NOT NULL
    );
    "#,
    )
}
