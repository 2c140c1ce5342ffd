// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Whole-store backup documents.

use crate::error::{StoreError, StoreResult};
use crate::models::{AppSettings, DailySummary, Service, Transaction, UserPreferences, date_key};
use crate::store::{self, Collection, Record};
use crate::summary;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

pub const BACKUP_VERSION: &str = "1.0";
pub const BACKUP_APP: &str = "SaloonLite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub summaries: Vec<DailySummary>,
    #[serde(default)]
    pub preferences: Vec<UserPreferences>,
    #[serde(default)]
    pub settings: Vec<AppSettings>,
    #[serde(default)]
    pub export_date: String,
    pub version: String,
    #[serde(default)]
    pub app: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    pub services: usize,
    pub transactions: usize,
    pub summaries: usize,
    pub preferences: usize,
    pub settings: usize,
}

pub fn export_all(conn: &Connection, exported_at: DateTime<Utc>) -> StoreResult<Backup> {
    let mut services = store::get_all::<Service>(conn)?;
    services.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let mut transactions = store::get_all::<Transaction>(conn)?;
    transactions.sort_by(|a, b| a.datetime.cmp(&b.datetime).then_with(|| a.id.cmp(&b.id)));
    let mut summaries = store::get_all::<DailySummary>(conn)?;
    summaries.sort_by(|a, b| a.date_key.cmp(&b.date_key));

    let backup = Backup {
        services,
        transactions,
        summaries,
        preferences: store::get_all::<UserPreferences>(conn)?,
        settings: store::get_all::<AppSettings>(conn)?,
        export_date: exported_at.to_rfc3339(),
        version: BACKUP_VERSION.into(),
        app: BACKUP_APP.into(),
    };
    info!(
        services = backup.services.len(),
        transactions = backup.transactions.len(),
        summaries = backup.summaries.len(),
        "store exported"
    );
    Ok(backup)
}

pub fn export_json(conn: &Connection) -> StoreResult<String> {
    let backup = export_all(conn, Utc::now())?;
    serde_json::to_string_pretty(&backup).map_err(|source| StoreError::Corrupt {
        collection: "backup",
        source,
    })
}

pub fn parse_backup(json: &str) -> StoreResult<Backup> {
    let backup: Backup =
        serde_json::from_str(json).map_err(|e| StoreError::ImportFormat(e.to_string()))?;
    validate(&backup)?;
    Ok(backup)
}

/// Parses and checks `json`, then replaces the store's contents with it.
pub fn import_json(conn: &mut Connection, json: &str) -> StoreResult<ImportCounts> {
    let backup = parse_backup(json)?;
    import_all(conn, &backup)
}

/// Clears the exported collections and loads `backup` into them in one unit of work.
///
/// Summaries are written as replayed from the document's transactions, after the
/// document's own summaries have been checked against them.
pub fn import_all(conn: &mut Connection, backup: &Backup) -> StoreResult<ImportCounts> {
    let summaries = validate(backup)?;

    let tx = conn.transaction()?;
    for c in Collection::EXPORTED {
        store::clear(&tx, c)?;
    }
    insert_each(&tx, &backup.services)?;
    insert_each(&tx, &backup.transactions)?;
    insert_each(&tx, &summaries)?;
    insert_each(&tx, &backup.preferences)?;
    insert_each(&tx, &backup.settings)?;
    tx.commit()?;

    let counts = ImportCounts {
        services: backup.services.len(),
        transactions: backup.transactions.len(),
        summaries: summaries.len(),
        preferences: backup.preferences.len(),
        settings: backup.settings.len(),
    };
    info!(?counts, "store replaced from backup");
    Ok(counts)
}

/// Removes every exported record. The PIN settings are kept.
pub fn clear_all(conn: &mut Connection) -> StoreResult<()> {
    let tx = conn.transaction()?;
    for c in Collection::EXPORTED {
        store::clear(&tx, c)?;
    }
    tx.commit()?;
    warn!("all data cleared");
    Ok(())
}

fn insert_each<R: Record>(conn: &Connection, records: &[R]) -> StoreResult<()> {
    for r in records {
        store::insert(conn, r)?;
    }
    Ok(())
}

fn import_error(msg: String) -> StoreError {
    StoreError::ImportFormat(msg)
}

/// Backups written by floating-point clients may be off by rounding noise.
fn within_a_cent(a: Decimal, b: Decimal) -> bool {
    a.checked_sub(b).is_some_and(|d| d.abs() < Decimal::new(1, 2))
}

/// Checks `backup` and returns the summaries to store.
fn validate(backup: &Backup) -> StoreResult<Vec<DailySummary>> {
    if !backup.version.starts_with("1.") {
        return Err(import_error(format!(
            "unsupported backup version '{}'",
            backup.version
        )));
    }
    for t in &backup.transactions {
        let expected = date_key(t.datetime.date());
        if t.date_key != expected {
            return Err(import_error(format!(
                "transaction {} has dateKey {} but occurred on {}",
                t.id, t.date_key, expected
            )));
        }
        if t.amount < Decimal::ZERO {
            return Err(import_error(format!(
                "transaction {} has negative amount {}",
                t.id, t.amount
            )));
        }
    }
    unique_keys(&backup.services)?;
    unique_keys(&backup.transactions)?;
    unique_keys(&backup.summaries)?;
    unique_keys(&backup.preferences)?;
    unique_keys(&backup.settings)?;

    let replayed =
        summary::replay(&backup.transactions).map_err(|e| import_error(e.to_string()))?;
    for s in &backup.summaries {
        if s.date_key != date_key(s.date) {
            return Err(import_error(format!(
                "summary {} does not match its date {}",
                s.date_key, s.date
            )));
        }
        let consistent = s
            .total_sales
            .checked_sub(s.total_expenses)
            .is_some_and(|net| within_a_cent(net, s.net_profit));
        if !consistent {
            return Err(import_error(format!(
                "summary {} has netProfit {} but sales {} and expenses {}",
                s.date_key, s.net_profit, s.total_sales, s.total_expenses
            )));
        }
        let expected = replayed
            .get(&s.date_key)
            .cloned()
            .unwrap_or_else(|| DailySummary::empty(s.date));
        if s.transaction_count != expected.transaction_count
            || !within_a_cent(s.total_sales, expected.total_sales)
            || !within_a_cent(s.total_expenses, expected.total_expenses)
        {
            return Err(import_error(format!(
                "summary {} disagrees with its transactions ({} recorded, {} present)",
                s.date_key, s.transaction_count, expected.transaction_count
            )));
        }
    }
    Ok(replayed.into_values().collect())
}

fn unique_keys<R: Record>(records: &[R]) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for r in records {
        let key = r.key();
        if !seen.insert(key.clone()) {
            return Err(import_error(format!(
                "duplicate key '{}' in {}",
                key,
                R::COLLECTION.table()
            )));
        }
    }
    Ok(())
}
