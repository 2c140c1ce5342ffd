// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionDetail};
use crate::queries;
use crate::utils::{optional_arg, parse_date, required_arg};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn columns(t: &Transaction) -> [String; 9] {
    let (party, item, method, note) = match &t.detail {
        TransactionDetail::Sale { customer, service } => {
            (customer.clone(), service.clone(), String::new(), String::new())
        }
        TransactionDetail::Expense {
            category,
            vendor,
            description,
            payment_method,
        } => (
            vendor.clone(),
            category.clone(),
            payment_method.to_string(),
            description.clone(),
        ),
    };
    [
        t.id.clone(),
        t.date_key.clone(),
        t.datetime.format("%H:%M:%S").to_string(),
        t.kind().to_string(),
        t.amount.to_string(),
        party,
        item,
        method,
        note,
    ]
}

const HEADERS: [&str; 9] = [
    "id", "date", "time", "type", "amount", "party", "item", "method", "note",
];

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required_arg(sub, "format")?.to_lowercase();
    let out = required_arg(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let mut rows = match (optional_arg(sub, "from"), optional_arg(sub, "to")) {
        (None, None) => queries::all_transactions(conn)?,
        (from, to) => {
            let first = from.map(parse_date).transpose()?.unwrap_or(chrono::NaiveDate::MIN);
            let last = to.map(parse_date).transpose()?.unwrap_or_else(queries::today);
            queries::transactions_between_days(conn, first, last)?
        }
    };
    // oldest first reads naturally in a spreadsheet
    rows.reverse();

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(HEADERS)?;
        for t in &rows {
            wtr.write_record(columns(t))?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .iter()
            .map(|t| {
                let [id, date, time, kind, amount, party, item, method, note] = columns(t);
                json!({
                    "id": id, "date": date, "time": time, "type": kind, "amount": amount,
                    "party": party, "item": item, "method": method, "note": note
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported {} transaction(s) to {}", rows.len(), out);
    Ok(())
}
