// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keyed record collections on top of SQLite.
//!
//! Every collection is a table `(key, body, <index columns>)` where `body` is the
//! record's JSON document. The functions here take `&Connection`, so they run
//! equally against a bare connection or inside a `rusqlite::Transaction`.

use crate::error::{StoreError, StoreResult};
use crate::models::{
    AppSettings, DailySummary, PinSettings, Service, Transaction, UserPreferences,
};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Timestamp layout of the `datetime` index column; sorts chronologically.
pub const DATETIME_INDEX_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Transactions,
    Summaries,
    Preferences,
    Settings,
    PinSettings,
}

impl Collection {
    /// The collections carried by a backup document.
    pub const EXPORTED: [Collection; 5] = [
        Collection::Services,
        Collection::Transactions,
        Collection::Summaries,
        Collection::Preferences,
        Collection::Settings,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Transactions => "transactions",
            Collection::Summaries => "summaries",
            Collection::Preferences => "preferences",
            Collection::Settings => "settings",
            Collection::PinSettings => "pin_settings",
        }
    }

    pub fn indexes(&self) -> &'static [Index] {
        match self {
            Collection::Services => &[Index::Key, Index::IsActive],
            Collection::Transactions => &[Index::Key, Index::Datetime, Index::DateKey, Index::Kind],
            _ => &[Index::Key],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    Key,
    Datetime,
    DateKey,
    Kind,
    IsActive,
}

impl Index {
    pub fn column(&self) -> &'static str {
        match self {
            Index::Key => "key",
            Index::Datetime => "datetime",
            Index::DateKey => "date_key",
            Index::Kind => "kind",
            Index::IsActive => "is_active",
        }
    }
}

/// A document stored in one collection under a string key.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn key(&self) -> String;

    /// Values for the collection's secondary index columns.
    fn index_values(&self) -> Vec<(Index, String)> {
        Vec::new()
    }
}

impl Record for Transaction {
    const COLLECTION: Collection = Collection::Transactions;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn index_values(&self) -> Vec<(Index, String)> {
        vec![
            (
                Index::Datetime,
                self.datetime.format(DATETIME_INDEX_FORMAT).to_string(),
            ),
            (Index::DateKey, self.date_key.clone()),
            (Index::Kind, self.kind().as_str().to_string()),
        ]
    }
}

impl Record for DailySummary {
    const COLLECTION: Collection = Collection::Summaries;

    fn key(&self) -> String {
        self.date_key.clone()
    }
}

impl Record for Service {
    const COLLECTION: Collection = Collection::Services;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn index_values(&self) -> Vec<(Index, String)> {
        vec![(Index::IsActive, if self.is_active { "1" } else { "0" }.into())]
    }
}

pub const PIN_SETTINGS_KEY: &str = "pinSettings";
pub const PREFERENCES_KEY: &str = "default";
pub const APP_SETTINGS_KEY: &str = "appSettings";

impl Record for PinSettings {
    const COLLECTION: Collection = Collection::PinSettings;

    fn key(&self) -> String {
        PIN_SETTINGS_KEY.into()
    }
}

impl Record for UserPreferences {
    const COLLECTION: Collection = Collection::Preferences;

    fn key(&self) -> String {
        PREFERENCES_KEY.into()
    }
}

impl Record for AppSettings {
    const COLLECTION: Collection = Collection::Settings;

    fn key(&self) -> String {
        APP_SETTINGS_KEY.into()
    }
}

fn encode<R: Record>(record: &R) -> StoreResult<String> {
    serde_json::to_string(record).map_err(|source| StoreError::Corrupt {
        collection: R::COLLECTION.table(),
        source,
    })
}

fn decode<R: Record>(body: &str) -> StoreResult<R> {
    serde_json::from_str(body).map_err(|source| StoreError::Corrupt {
        collection: R::COLLECTION.table(),
        source,
    })
}

fn write<R: Record>(conn: &Connection, record: &R, upsert: bool) -> StoreResult<()> {
    let table = R::COLLECTION.table();
    let indexes = record.index_values();

    let mut columns = vec!["key", "body"];
    columns.extend(indexes.iter().map(|(idx, _)| idx.column()));
    let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("?{}", n)).collect();

    let mut sql = format!(
        "INSERT INTO {}({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    if upsert {
        let updates: Vec<String> = columns[1..]
            .iter()
            .map(|c| format!("{c}=excluded.{c}"))
            .collect();
        sql.push_str(" ON CONFLICT(key) DO UPDATE SET ");
        sql.push_str(&updates.join(", "));
    }

    let mut values = vec![record.key(), encode(record)?];
    values.extend(indexes.into_iter().map(|(_, v)| v));
    conn.execute(&sql, params_from_iter(values.iter()))?;
    Ok(())
}

/// Upserts by key, refreshing the index columns.
pub fn put<R: Record>(conn: &Connection, record: &R) -> StoreResult<()> {
    write(conn, record, true)
}

/// Adds a record; fails if the key is already taken.
pub fn insert<R: Record>(conn: &Connection, record: &R) -> StoreResult<()> {
    write(conn, record, false)
}

pub fn get<R: Record>(conn: &Connection, key: &str) -> StoreResult<Option<R>> {
    let sql = format!("SELECT body FROM {} WHERE key=?1", R::COLLECTION.table());
    let body: Option<String> = conn
        .query_row(&sql, params![key], |r| r.get(0))
        .optional()?;
    body.map(|b| decode::<R>(&b)).transpose()
}

pub fn get_all<R: Record>(conn: &Connection) -> StoreResult<Vec<R>> {
    let sql = format!("SELECT body FROM {}", R::COLLECTION.table());
    collect_bodies(conn, &sql, &[])
}

/// Returns whether a record was removed. Absent keys are not an error.
pub fn delete<R: Record>(conn: &Connection, key: &str) -> StoreResult<bool> {
    let sql = format!("DELETE FROM {} WHERE key=?1", R::COLLECTION.table());
    let n = conn.execute(&sql, params![key])?;
    Ok(n > 0)
}

/// Records whose `index` value lies in `[lower, upper]`, compared as strings.
pub fn range_scan<R: Record>(
    conn: &Connection,
    index: Index,
    lower: &str,
    upper: &str,
) -> StoreResult<Vec<R>> {
    if !R::COLLECTION.indexes().contains(&index) {
        return Err(StoreError::Io(rusqlite::Error::InvalidColumnName(format!(
            "{}.{}",
            R::COLLECTION.table(),
            index.column()
        ))));
    }
    let column = index.column();
    let sql = format!(
        "SELECT body FROM {} WHERE {col} >= ?1 AND {col} <= ?2 ORDER BY {col}",
        R::COLLECTION.table(),
        col = column
    );
    collect_bodies(conn, &sql, &[lower, upper])
}

pub fn clear(conn: &Connection, collection: Collection) -> StoreResult<()> {
    conn.execute(&format!("DELETE FROM {}", collection.table()), [])?;
    Ok(())
}

pub fn count(conn: &Connection, collection: Collection) -> StoreResult<usize> {
    let n: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", collection.table()),
        [],
        |r| r.get(0),
    )?;
    Ok(n as usize)
}

fn collect_bodies<R: Record>(conn: &Connection, sql: &str, args: &[&str]) -> StoreResult<Vec<R>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(args.iter()))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let body: String = r.get(0)?;
        out.push(decode::<R>(&body)?);
    }
    Ok(out)
}
