// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, DashboardMetrics};
use crate::preferences::get_user_preferences;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table};
use crate::{catalog, queries};
use anyhow::Result;
use chrono::{Days, NaiveDate};
use rusqlite::Connection;

/// Dashboard figures over the `days` days ending `today`, inclusive.
pub fn metrics(conn: &Connection, today: NaiveDate, days: u32) -> Result<DashboardMetrics> {
    let start = today
        .checked_sub_days(Days::new(u64::from(days.max(1) - 1)))
        .unwrap_or(NaiveDate::MIN);
    let summaries = queries::summaries_by_range(conn, start, today)?;
    let transactions = queries::transactions_between_days(conn, start, today)?;
    let services = catalog::get_services(conn)?;
    Ok(analytics::dashboard(&summaries, &transactions, &services))
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let days = m.get_one::<u32>("days").copied().unwrap_or(30);
    let d = metrics(conn, queries::today(), days)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &d)? {
        return Ok(());
    }

    let ccy = get_user_preferences(conn)?.currency;
    let overview = vec![
        vec!["Revenue".into(), fmt_money(&d.totals.total_revenue, &ccy)],
        vec!["Expenses".into(), fmt_money(&d.totals.total_expenses, &ccy)],
        vec!["Net profit".into(), fmt_money(&d.totals.total_profit, &ccy)],
        vec!["Transactions".into(), d.totals.total_transactions.to_string()],
        vec!["This week".into(), fmt_money(&d.trend.current_week_revenue, &ccy)],
        vec!["Last week".into(), fmt_money(&d.trend.previous_week_revenue, &ccy)],
        vec!["Weekly growth".into(), fmt_pct(d.weekly_growth)],
        vec!["Consistency".into(), fmt_pct(d.revenue_consistency)],
        vec![
            "Monthly growth".into(),
            d.monthly_growth.map(fmt_pct).unwrap_or_else(|| "n/a".into()),
        ],
        vec![
            "Best day".into(),
            d.best_performing_day.clone().unwrap_or_else(|| "n/a".into()),
        ],
        vec!["Avg sale".into(), fmt_money(&d.average_service_value, &ccy)],
        vec![
            "Tx per day".into(),
            format!("{:.1}", d.daily_transaction_average),
        ],
        vec!["Expense ratio".into(), fmt_pct(d.expense_ratio)],
        vec!["Profit margin".into(), fmt_pct(d.profit_margin)],
        vec![
            "Peak hours".into(),
            d.peak_hours
                .iter()
                .map(|h| h.label())
                .collect::<Vec<_>>()
                .join(", "),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], overview));

    if !d.service_distribution.is_empty() {
        let rows = d
            .service_distribution
            .iter()
            .map(|s| {
                vec![
                    s.service.clone(),
                    fmt_money(&s.revenue, &ccy),
                    fmt_pct(s.percentage),
                    s.transaction_count.to_string(),
                    fmt_money(&s.average_revenue, &ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Service", "Revenue", "Share", "Sales", "Average"], rows)
        );
    }
    Ok(())
}
