// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::DailySummary;
use crate::summary;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

fn describe(s: Option<&DailySummary>) -> String {
    match s {
        Some(s) => format!(
            "sales {} / expenses {} / {} tx",
            s.total_sales, s.total_expenses, s.transaction_count
        ),
        None => "-".into(),
    }
}

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    let drift = summary::find_drift(conn)?;
    let fix = m.get_flag("fix");
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &drift)? {
        if fix && !drift.is_empty() {
            summary::rewrite_summaries(conn)?;
        }
        return Ok(());
    }

    if drift.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    let rows = drift
        .iter()
        .map(|d| {
            vec![
                d.date_key.clone(),
                describe(d.stored.as_ref()),
                describe(d.expected.as_ref()),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Day", "Stored", "From ledger"], rows));

    if fix {
        let written = summary::rewrite_summaries(conn)?;
        println!("Rebuilt {} daily summaries", written);
    } else {
        println!("Run `saloonlite doctor --fix` to rebuild summaries from transactions");
    }
    Ok(())
}
