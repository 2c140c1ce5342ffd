// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use saloonlite::analytics::{self, HourRange, OTHER_BUCKET};
use saloonlite::models::{DailySummary, NewTransaction, PaymentMethod, Service, Transaction, TransactionType};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(date: NaiveDate, h: u32) -> NaiveDateTime {
    date.and_hms_opt(h, 0, 0).unwrap()
}

fn summary(date: NaiveDate, sales: i64, expenses: i64, count: u32) -> DailySummary {
    let mut s = DailySummary::empty(date);
    s.fold(TransactionType::Sale, Decimal::from(sales)).unwrap();
    s.fold(TransactionType::Expense, Decimal::from(expenses)).unwrap();
    s.transaction_count = count;
    s
}

fn sale(id: &str, amount: i64, when: NaiveDateTime, service: &str) -> Transaction {
    Transaction::from_new(
        id.into(),
        NewTransaction::sale(Decimal::from(amount), when, "", service),
    )
}

fn service(name: &str, active: bool) -> Service {
    let now = at(day(2024, 1, 1), 8);
    Service {
        id: name.to_lowercase(),
        name: name.into(),
        price: Decimal::from(10),
        is_active: active,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn growth_from_zero_week_is_zero() {
    // ISO week 2 then week 3 of 2024
    let summaries = vec![summary(day(2024, 1, 10), 0, 0, 0), summary(day(2024, 1, 17), 100, 0, 3)];
    let trend = analytics::weekly_trend(&summaries);
    assert_eq!(trend.current_week_revenue, Decimal::from(100));
    assert_eq!(trend.previous_week_revenue, Decimal::ZERO);
    assert_eq!(trend.growth_percentage, 0.0);
    assert_eq!(trend.consistency_score, 50.0);
}

#[test]
fn growth_between_weeks() {
    let summaries = vec![
        summary(day(2024, 1, 8), 40, 0, 1),
        summary(day(2024, 1, 12), 60, 0, 1),
        summary(day(2024, 1, 15), 150, 0, 2),
    ];
    let trend = analytics::weekly_trend(&summaries);
    assert_eq!(trend.previous_week_revenue, Decimal::from(100));
    assert_eq!(trend.growth_percentage, 50.0);
}

#[test]
fn weeks_group_across_the_year_boundary() {
    // 2024-12-30 and 2025-01-02 are both ISO 2025-W01; 2024-12-27 is 2024-W52
    let summaries = vec![
        summary(day(2024, 12, 27), 100, 0, 1),
        summary(day(2024, 12, 30), 90, 0, 1),
        summary(day(2025, 1, 2), 60, 0, 1),
    ];
    let trend = analytics::weekly_trend(&summaries);
    assert_eq!(trend.current_week_revenue, Decimal::from(150));
    assert_eq!(trend.previous_week_revenue, Decimal::from(100));
    assert_eq!(trend.growth_percentage, 50.0);
}

#[test]
fn single_week_leaves_trend_zeroed() {
    let summaries = vec![summary(day(2024, 1, 8), 40, 0, 1), summary(day(2024, 1, 9), 0, 0, 0)];
    let trend = analytics::weekly_trend(&summaries);
    assert_eq!(trend.current_week_revenue, Decimal::ZERO);
    assert_eq!(trend.previous_week_revenue, Decimal::ZERO);
    assert_eq!(trend.growth_percentage, 0.0);
    assert_eq!(trend.consistency_score, 50.0);
}

#[test]
fn percent_survives_out_of_range_quotients() {
    let p = analytics::percent(Decimal::from(1000), Decimal::new(1, 28));
    assert!(p.is_finite());
    assert!(p > 1e30);
    assert_eq!(analytics::percent(Decimal::MAX, Decimal::ZERO), 0.0);
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let mut big = DailySummary::empty(day(2024, 1, 8));
    big.fold(TransactionType::Sale, Decimal::MAX).unwrap();
    let mut next = DailySummary::empty(day(2024, 1, 15));
    next.fold(TransactionType::Sale, Decimal::MAX).unwrap();
    let summaries = vec![big, next];

    assert_eq!(analytics::period_totals(&summaries).total_revenue, Decimal::MAX);
    assert_eq!(analytics::best_performing_day(&summaries), Some(Weekday::Mon));
    let m = analytics::dashboard(&summaries, &[], &[]);
    assert_eq!(m.profit_margin, 100.0);
}

#[test]
fn distribution_sums_to_hundred() {
    let services = vec![service("Haircut", true), service("Beard Trim", true), service("Dye", false)];
    let d = day(2024, 2, 1);
    let txs = vec![
        sale("a", 30, at(d, 10), "haircut "),
        sale("b", 30, at(d, 11), "Haircut"),
        sale("c", 20, at(d, 12), "Beard Trim"),
        sale("d", 10, at(d, 13), "Dye"),
        sale("e", 10, at(d, 14), ""),
    ];
    let shares = analytics::service_distribution(&txs, &services);
    let total: f64 = shares.iter().map(|s| s.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);

    assert_eq!(shares[0].service, "Haircut");
    assert_eq!(shares[0].transaction_count, 2);
    assert_eq!(shares[0].average_revenue, Decimal::from(30));
    // inactive and blank services land in the catch-all
    let other = shares.iter().find(|s| s.service == OTHER_BUCKET).unwrap();
    assert_eq!(other.revenue, Decimal::from(20));
}

#[test]
fn no_sales_means_no_buckets() {
    let services = vec![service("Haircut", true)];
    let expense = Transaction::from_new(
        "x".into(),
        NewTransaction::expense(Decimal::from(5), at(day(2024, 2, 1), 9), "Rent", "", "", PaymentMethod::Cash),
    );
    assert!(analytics::service_distribution(&[expense.clone()], &services).is_empty());
    assert_eq!(analytics::average_service_value(&[expense]), Decimal::ZERO);
}

#[test]
fn best_day_by_weekday_totals() {
    assert_eq!(analytics::best_performing_day(&[]), None);
    // 2024-01-06 and 2024-01-13 are Saturdays, 2024-01-08 is a Monday
    let summaries = vec![
        summary(day(2024, 1, 6), 50, 0, 1),
        summary(day(2024, 1, 13), 50, 0, 1),
        summary(day(2024, 1, 8), 90, 0, 1),
    ];
    assert_eq!(analytics::best_performing_day(&summaries), Some(Weekday::Sat));

    let flat = vec![summary(day(2024, 1, 8), 0, 0, 0)];
    assert_eq!(analytics::best_performing_day(&flat), Some(Weekday::Sun));
}

#[test]
fn peak_hours_top_two() {
    let d = day(2024, 2, 1);
    let txs = vec![
        sale("a", 1, at(d, 7), ""),
        sale("b", 1, at(d, 12), ""),
        sale("c", 1, at(d, 13), ""),
        sale("d", 1, at(d, 19), ""),
        sale("e", 1, at(d, 20), ""),
        sale("f", 1, at(d, 2), ""),
    ];
    // early hours fold into 6-9AM, which ties with the later buckets
    assert_eq!(
        analytics::peak_hours(&txs),
        vec![HourRange::EarlyMorning, HourRange::Midday]
    );
    assert!(analytics::peak_hours(&[]).is_empty());
    assert_eq!(HourRange::from_hour(16).label(), "4-6PM");
}

#[test]
fn ratios_and_monthly_growth() {
    let summaries: Vec<DailySummary> = (1..=14)
        .map(|i| summary(day(2024, 3, i), if i <= 7 { 10 } else { 15 }, 5, 2))
        .collect();
    assert_eq!(analytics::monthly_growth(&summaries[..6]), None);
    assert_eq!(analytics::monthly_growth(&summaries), Some(50.0));

    let totals = analytics::period_totals(&summaries);
    assert_eq!(totals.total_revenue, Decimal::from(175));
    assert_eq!(totals.total_expenses, Decimal::from(70));
    assert_eq!(analytics::expense_ratio(&summaries), 40.0);
    assert_eq!(analytics::profit_margin(&summaries), 60.0);
    assert_eq!(analytics::daily_transaction_average(&summaries), 2.0);
    assert_eq!(analytics::expense_ratio(&[]), 0.0);

    let best = analytics::best_day_summary(&summaries).unwrap();
    assert_eq!(best.date_key, "2024-03-08");
}

#[test]
fn dashboard_bundles_metrics() {
    let d = day(2024, 2, 1);
    let summaries = vec![summary(d, 40, 10, 2)];
    let txs = vec![sale("a", 25, at(d, 10), "Haircut"), sale("b", 15, at(d, 15), "Styling")];
    let m = analytics::dashboard(&summaries, &txs, &[service("Haircut", true)]);
    assert_eq!(m.best_performing_day.as_deref(), Some("Thursday"));
    assert_eq!(m.average_service_value, Decimal::from(20));
    assert_eq!(m.service_distribution.len(), 2);
    assert_eq!(m.monthly_growth, None);
    assert_eq!(m.weekly_growth, m.trend.growth_percentage);
}
