// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewTransaction, PaymentMethod, Transaction, TransactionDetail, TransactionType};
use crate::preferences::get_user_preferences;
use crate::utils::{
    fmt_money, maybe_print_json, now, optional_arg, parse_date, parse_datetime, parse_decimal,
    pretty_table, required_arg,
};
use crate::{catalog, queries, summary};
use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add-sale", sub)) => add_sale(conn, sub)?,
        Some(("add-expense", sub)) => add_expense(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn occurred_at(sub: &clap::ArgMatches) -> Result<NaiveDateTime> {
    match optional_arg(sub, "at") {
        Some(s) => parse_datetime(s),
        None => Ok(now()),
    }
}

fn add_sale(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let service = optional_arg(sub, "service").unwrap_or("");
    let customer = optional_arg(sub, "customer").unwrap_or("");
    let known = if service.is_empty() {
        None
    } else {
        catalog::find_by_name(conn, service)?
    };
    if !service.is_empty() && known.is_none() {
        println!("Note: '{}' is not in the catalog; it will count as Other", service);
    }
    let amount = match (optional_arg(sub, "amount"), &known) {
        (Some(a), _) => parse_decimal(a)?,
        (None, Some(s)) => s.price,
        (None, None) => return Err(anyhow!("--amount is required when no catalog service is given")),
    };
    // record the catalog spelling so the service mix groups cleanly
    let service_name = known.as_ref().map(|s| s.name.as_str()).unwrap_or(service);

    let at = occurred_at(sub)?;
    let t = summary::add_transaction(conn, NewTransaction::sale(amount, at, customer, service_name))?;
    let ccy = get_user_preferences(conn)?.currency;
    println!(
        "Recorded sale of {} on {} ({})",
        fmt_money(&t.amount, &ccy),
        t.date_key,
        if service_name.is_empty() { "no service" } else { service_name }
    );
    Ok(())
}

fn add_expense(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(required_arg(sub, "amount")?)?;
    let category = required_arg(sub, "category")?;
    let vendor = optional_arg(sub, "vendor").unwrap_or("");
    let description = optional_arg(sub, "description").unwrap_or("");
    let method: PaymentMethod = required_arg(sub, "method")?
        .parse()
        .map_err(|e: String| anyhow!(e))?;

    let at = occurred_at(sub)?;
    let t = summary::add_transaction(
        conn,
        NewTransaction::expense(amount, at, category, vendor, description, method),
    )?;
    let ccy = get_user_preferences(conn)?.currency;
    println!(
        "Recorded expense of {} on {} ({}, {})",
        fmt_money(&t.amount, &ccy),
        t.date_key,
        category.trim(),
        method
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.datetime.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.party.clone(),
                    r.item.clone(),
                    r.method.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["When", "Type", "Amount", "Customer/Vendor", "Service/Category", "Paid By", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub datetime: String,
    pub kind: String,
    pub amount: String,
    pub party: String,
    pub item: String,
    pub method: String,
    pub note: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
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
        TransactionRow {
            id: t.id.clone(),
            datetime: t.datetime.format("%Y-%m-%d %H:%M").to_string(),
            kind: t.kind().to_string(),
            amount: format!("{:.2}", t.amount),
            party,
            item,
            method,
            note,
        }
    }
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut data = if sub.get_flag("today") {
        queries::today_transactions(conn)?
    } else if let Some(d) = optional_arg(sub, "date") {
        queries::transactions_by_date(conn, parse_date(d)?)?
    } else {
        match (optional_arg(sub, "from"), optional_arg(sub, "to")) {
            (None, None) => queries::all_transactions(conn)?,
            (from, to) => {
                let first = from.map(parse_date).transpose()?.unwrap_or(chrono::NaiveDate::MIN);
                let last = to.map(parse_date).transpose()?.unwrap_or_else(queries::today);
                queries::transactions_between_days(conn, first, last)?
            }
        }
    };

    if let Some(kind) = optional_arg(sub, "type") {
        let kind: TransactionType = kind.parse().map_err(|e: String| anyhow!(e))?;
        data.retain(|t| t.kind() == kind);
    }
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data.iter().map(TransactionRow::from).collect())
}
