// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::StoreResult;
use crate::models::{DailySummary, Transaction, TransactionType, date_key};
use crate::store::{self, DATETIME_INDEX_FORMAT, Index};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::str::FromStr;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The stored summary for `day`, or a zeroed one when nothing was recorded.
pub fn get_daily_summary(conn: &Connection, day: NaiveDate) -> StoreResult<DailySummary> {
    Ok(store::get::<DailySummary>(conn, &date_key(day))?
        .unwrap_or_else(|| DailySummary::empty(day)))
}

/// Summaries with `dateKey` in `[start, end]`, latest day first.
pub fn summaries_by_range(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> StoreResult<Vec<DailySummary>> {
    let mut out =
        store::range_scan::<DailySummary>(conn, Index::Key, &date_key(start), &date_key(end))?;
    out.sort_by(|a, b| b.date_key.cmp(&a.date_key));
    Ok(out)
}

pub fn transactions_by_date(conn: &Connection, day: NaiveDate) -> StoreResult<Vec<Transaction>> {
    let key = date_key(day);
    let mut out = store::range_scan::<Transaction>(conn, Index::DateKey, &key, &key)?;
    newest_first(&mut out);
    Ok(out)
}

/// Transactions with `datetime` in `[start, end]`, newest first.
pub fn transactions_by_range(
    conn: &Connection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> StoreResult<Vec<Transaction>> {
    let lower = start.format(DATETIME_INDEX_FORMAT).to_string();
    let upper = end.format(DATETIME_INDEX_FORMAT).to_string();
    let mut out = store::range_scan::<Transaction>(conn, Index::Datetime, &lower, &upper)?;
    newest_first(&mut out);
    Ok(out)
}

/// Every transaction on the calendar days `first..=last`, newest first.
pub fn transactions_between_days(
    conn: &Connection,
    first: NaiveDate,
    last: NaiveDate,
) -> StoreResult<Vec<Transaction>> {
    let mut out = store::range_scan::<Transaction>(
        conn,
        Index::DateKey,
        &date_key(first),
        &date_key(last),
    )?;
    newest_first(&mut out);
    Ok(out)
}

pub fn transactions_by_type(
    conn: &Connection,
    kind: TransactionType,
) -> StoreResult<Vec<Transaction>> {
    let mut out = store::range_scan::<Transaction>(conn, Index::Kind, kind.as_str(), kind.as_str())?;
    newest_first(&mut out);
    Ok(out)
}

pub fn all_transactions(conn: &Connection) -> StoreResult<Vec<Transaction>> {
    let mut out = store::get_all::<Transaction>(conn)?;
    newest_first(&mut out);
    Ok(out)
}

pub fn today_transactions(conn: &Connection) -> StoreResult<Vec<Transaction>> {
    transactions_by_date(conn, today())
}

fn newest_first(v: &mut [Transaction]) {
    v.sort_by(|a, b| b.datetime.cmp(&a.datetime).then_with(|| b.id.cmp(&a.id)));
}

/// Preset windows offered by the sales history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    Today,
    ThisWeek,
    ThisMonth,
    All,
}

impl HistoryFilter {
    /// The inclusive day range the filter covers, ending on `today`.
    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            HistoryFilter::Today => today,
            // weeks start on Sunday here
            HistoryFilter::ThisWeek => {
                today - chrono::Duration::days(today.weekday().num_days_from_sunday() as i64)
            }
            HistoryFilter::ThisMonth => today.with_day(1).unwrap_or(today),
            HistoryFilter::All => NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN),
        };
        (start, today)
    }
}

impl FromStr for HistoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(HistoryFilter::Today),
            "this-week" | "week" => Ok(HistoryFilter::ThisWeek),
            "this-month" | "month" => Ok(HistoryFilter::ThisMonth),
            "all" => Ok(HistoryFilter::All),
            other => Err(format!(
                "unknown filter '{}' (use today|this-week|this-month|all)",
                other
            )),
        }
    }
}
