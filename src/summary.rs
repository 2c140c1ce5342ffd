// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keeps the per-day aggregates in lockstep with the transaction ledger.

use crate::error::{StoreError, StoreResult};
use crate::models::{DailySummary, NewTransaction, Transaction};
use crate::store::{self, Collection};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Records a sale or expense and folds it into its day's summary.
///
/// Both writes share one SQLite transaction: if either fails, neither is visible.
pub fn add_transaction(conn: &mut Connection, new: NewTransaction) -> StoreResult<Transaction> {
    if new.amount < Decimal::ZERO {
        return Err(StoreError::Validation(format!(
            "amount must not be negative (got {})",
            new.amount
        )));
    }
    let record = Transaction::from_new(Uuid::new_v4().to_string(), new);

    let tx = conn.transaction()?;
    store::insert(&tx, &record)?;
    let summary = fold_into_summary(&tx, &record)?;
    tx.commit()?;

    info!(
        id = %record.id,
        kind = %record.kind(),
        date_key = %record.date_key,
        amount = %record.amount,
        day_count = summary.transaction_count,
        "transaction recorded"
    );
    Ok(record)
}

/// Adds `t` to the stored summary for its `dateKey`, creating a zeroed one first
/// if the day has none. Callers supply the enclosing unit of work.
pub fn fold_into_summary(conn: &Connection, t: &Transaction) -> StoreResult<DailySummary> {
    let mut summary = store::get::<DailySummary>(conn, &t.date_key)?
        .unwrap_or_else(|| DailySummary::empty(t.datetime.date()));
    summary.fold(t.kind(), t.amount)?;
    store::put(conn, &summary)?;
    debug!(date_key = %summary.date_key, net = %summary.net_profit, "summary folded");
    Ok(summary)
}

/// Summaries as they would be if every stored transaction were replayed.
pub fn rebuild_expected(conn: &Connection) -> StoreResult<BTreeMap<String, DailySummary>> {
    replay(&store::get_all::<Transaction>(conn)?)
}

/// Folds `transactions` into fresh per-day summaries keyed by `dateKey`.
pub fn replay(transactions: &[Transaction]) -> StoreResult<BTreeMap<String, DailySummary>> {
    let mut out: BTreeMap<String, DailySummary> = BTreeMap::new();
    for t in transactions {
        out.entry(t.date_key.clone())
            .or_insert_with(|| DailySummary::empty(t.datetime.date()))
            .fold(t.kind(), t.amount)?;
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDrift {
    pub date_key: String,
    pub stored: Option<DailySummary>,
    pub expected: Option<DailySummary>,
}

/// Days whose stored summary disagrees with the replayed ledger.
pub fn find_drift(conn: &Connection) -> StoreResult<Vec<SummaryDrift>> {
    let mut expected = rebuild_expected(conn)?;
    let mut drift = Vec::new();

    let mut stored = store::get_all::<DailySummary>(conn)?;
    stored.sort_by(|a, b| a.date_key.cmp(&b.date_key));
    for s in stored {
        match expected.remove(&s.date_key) {
            Some(e) if same_totals(&s, &e) => {}
            e => drift.push(SummaryDrift {
                date_key: s.date_key.clone(),
                stored: Some(s),
                expected: e,
            }),
        }
    }
    for (date_key, e) in expected {
        drift.push(SummaryDrift {
            date_key,
            stored: None,
            expected: Some(e),
        });
    }
    drift.sort_by(|a, b| a.date_key.cmp(&b.date_key));
    info!(days = drift.len(), "summary drift check finished");
    Ok(drift)
}

fn same_totals(a: &DailySummary, b: &DailySummary) -> bool {
    a.total_sales == b.total_sales
        && a.total_expenses == b.total_expenses
        && a.net_profit == b.net_profit
        && a.transaction_count == b.transaction_count
}

/// Replaces every stored summary with the replayed ones. Returns how many were written.
pub fn rewrite_summaries(conn: &mut Connection) -> StoreResult<usize> {
    let tx = conn.transaction()?;
    let rebuilt = rebuild_expected(&tx)?;
    store::clear(&tx, Collection::Summaries)?;
    for summary in rebuilt.values() {
        store::insert(&tx, summary)?;
    }
    tx.commit()?;
    info!(days = rebuilt.len(), "summaries rebuilt from ledger");
    Ok(rebuilt.len())
}
