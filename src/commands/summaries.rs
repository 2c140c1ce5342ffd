// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{best_day_summary, period_totals};
use crate::models::DailySummary;
use crate::preferences::get_user_preferences;
use crate::queries::{self, HistoryFilter};
use crate::utils::{fmt_money, maybe_print_json, optional_arg, parse_date, pretty_table, required_arg};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("day", sub)) => day(conn, sub)?,
        Some(("history", sub)) => history(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary_row(s: &DailySummary, ccy: &str) -> Vec<String> {
    vec![
        s.date_key.clone(),
        fmt_money(&s.total_sales, ccy),
        fmt_money(&s.total_expenses, ccy),
        fmt_money(&s.net_profit, ccy),
        s.transaction_count.to_string(),
    ]
}

const HEADERS: [&str; 5] = ["Date", "Sales", "Expenses", "Net", "Transactions"];

fn day(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let day = match optional_arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => queries::today(),
    };
    let summary = queries::get_daily_summary(conn, day)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        let ccy = get_user_preferences(conn)?.currency;
        println!("{}", pretty_table(&HEADERS, vec![summary_row(&summary, &ccy)]));
    }
    Ok(())
}

pub fn history_range(sub: &clap::ArgMatches) -> Result<(chrono::NaiveDate, chrono::NaiveDate)> {
    let today = queries::today();
    let filter: HistoryFilter = required_arg(sub, "filter")?
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let (start, end) = filter.range(today);
    let start = optional_arg(sub, "from").map(parse_date).transpose()?.unwrap_or(start);
    let end = optional_arg(sub, "to").map(parse_date).transpose()?.unwrap_or(end);
    Ok((start, end))
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (start, end) = history_range(sub)?;
    let summaries = queries::summaries_by_range(conn, start, end)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summaries)? {
        return Ok(());
    }

    let ccy = get_user_preferences(conn)?.currency;
    let totals = period_totals(&summaries);
    let mut rows: Vec<Vec<String>> = summaries.iter().map(|s| summary_row(s, &ccy)).collect();
    rows.push(vec![
        "TOTAL".into(),
        fmt_money(&totals.total_revenue, &ccy),
        fmt_money(&totals.total_expenses, &ccy),
        fmt_money(&totals.total_profit, &ccy),
        totals.total_transactions.to_string(),
    ]);
    println!("{}", pretty_table(&HEADERS, rows));
    if let Some(best) = best_day_summary(&summaries) {
        println!(
            "Best day: {} with {} in sales",
            best.date_key,
            fmt_money(&best.total_sales, &ccy)
        );
    }
    Ok(())
}
