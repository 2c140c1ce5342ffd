// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard metrics derived from already-fetched summaries and transactions.
//!
//! Nothing in here touches the store; every function is a pure fold over its inputs.

use crate::models::{DailySummary, Service, Transaction};
use chrono::{Datelike, Timelike, Weekday};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const OTHER_BUCKET: &str = "Other";

/// Sunday-first, which is also the tie-break order for the best day.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// `part / whole * 100`, or 0 when `whole` is zero.
///
/// Quotients outside `Decimal`'s range are computed in `f64` instead.
pub fn percent(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    part.checked_div(whole)
        .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|p| p.to_f64())
        .or_else(|| Some(part.to_f64()? / whole.to_f64()? * 100.0))
        .filter(|p| p.is_finite())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTrend {
    pub current_week_revenue: Decimal,
    pub previous_week_revenue: Decimal,
    pub growth_percentage: f64,
    pub consistency_score: f64,
}

/// Sales per ISO week, keyed by (ISO year, week number).
pub fn weekly_sales(summaries: &[DailySummary]) -> BTreeMap<(i32, u32), Decimal> {
    let mut weeks = BTreeMap::new();
    for s in summaries {
        let w = s.date.iso_week();
        let week = weeks.entry((w.year(), w.week())).or_insert(Decimal::ZERO);
        *week = week.saturating_add(s.total_sales);
    }
    weeks
}

/// Compares the two most recent ISO weeks in `summaries`.
///
/// Revenue and growth stay zero until at least two weeks have data.
pub fn weekly_trend(summaries: &[DailySummary]) -> PerformanceTrend {
    let mut trend = PerformanceTrend {
        consistency_score: consistency_score(summaries),
        ..Default::default()
    };
    let weeks = weekly_sales(summaries);
    let mut recent = weeks.values().rev();
    if let (Some(current), Some(previous)) = (recent.next().copied(), recent.next().copied()) {
        trend.current_week_revenue = current;
        trend.previous_week_revenue = previous;
        trend.growth_percentage = percent(current.saturating_sub(previous), previous);
    }
    trend
}

/// Share of recorded days that had any sales, as a percentage.
pub fn consistency_score(summaries: &[DailySummary]) -> f64 {
    if summaries.is_empty() {
        return 0.0;
    }
    let with_sales = summaries
        .iter()
        .filter(|s| s.total_sales > Decimal::ZERO)
        .count();
    with_sales as f64 / summaries.len() as f64 * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceShare {
    pub service: String,
    pub revenue: Decimal,
    pub percentage: f64,
    pub average_revenue: Decimal,
    pub transaction_count: u32,
}

fn service_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Sale revenue per active catalog service, with unmatched sales under "Other".
///
/// Only buckets that received at least one sale are returned, largest share first.
pub fn service_distribution(transactions: &[Transaction], services: &[Service]) -> Vec<ServiceShare> {
    let mut buckets: Vec<(String, Decimal, u32)> = Vec::new();
    let mut lookup: HashMap<String, usize> = HashMap::new();
    for s in services.iter().filter(|s| s.is_active) {
        let key = service_key(&s.name);
        if key.is_empty() || key == service_key(OTHER_BUCKET) || lookup.contains_key(&key) {
            continue;
        }
        lookup.insert(key, buckets.len());
        buckets.push((s.name.trim().to_string(), Decimal::ZERO, 0));
    }
    let other = buckets.len();
    buckets.push((OTHER_BUCKET.to_string(), Decimal::ZERO, 0));

    let mut total = Decimal::ZERO;
    for t in transactions.iter().filter(|t| t.is_sale()) {
        let idx = t
            .service_name()
            .and_then(|name| lookup.get(&service_key(name)))
            .copied()
            .unwrap_or(other);
        buckets[idx].1 = buckets[idx].1.saturating_add(t.amount);
        buckets[idx].2 += 1;
        total = total.saturating_add(t.amount);
    }

    let mut out: Vec<ServiceShare> = buckets
        .into_iter()
        .filter(|(_, _, count)| *count > 0)
        .map(|(service, revenue, count)| ServiceShare {
            percentage: percent(revenue, total),
            average_revenue: revenue / Decimal::from(count),
            transaction_count: count,
            service,
            revenue,
        })
        .collect();
    out.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    out
}

pub fn average_service_value(transactions: &[Transaction]) -> Decimal {
    let (total, count) = transactions
        .iter()
        .filter(|t| t.is_sale())
        .fold((Decimal::ZERO, 0u32), |(sum, n), t| (sum.saturating_add(t.amount), n + 1));
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Weekday with the highest summed sales; `None` when there are no summaries.
pub fn best_performing_day(summaries: &[DailySummary]) -> Option<Weekday> {
    if summaries.is_empty() {
        return None;
    }
    let mut totals = [Decimal::ZERO; 7];
    for s in summaries {
        let day = &mut totals[s.date.weekday().num_days_from_sunday() as usize];
        *day = day.saturating_add(s.total_sales);
    }
    let mut best = 0;
    for i in 1..totals.len() {
        if totals[i] > totals[best] {
            best = i;
        }
    }
    Some(WEEK[best])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HourRange {
    #[serde(rename = "6-9AM")]
    EarlyMorning,
    #[serde(rename = "9-11AM")]
    Morning,
    #[serde(rename = "11AM-2PM")]
    Midday,
    #[serde(rename = "2-4PM")]
    Afternoon,
    #[serde(rename = "4-6PM")]
    LateAfternoon,
    #[serde(rename = "6PM+")]
    Evening,
}

impl HourRange {
    pub const ALL: [HourRange; 6] = [
        HourRange::EarlyMorning,
        HourRange::Morning,
        HourRange::Midday,
        HourRange::Afternoon,
        HourRange::LateAfternoon,
        HourRange::Evening,
    ];

    /// Hours before 6 count toward the first bucket.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=8 => HourRange::EarlyMorning,
            9..=10 => HourRange::Morning,
            11..=13 => HourRange::Midday,
            14..=15 => HourRange::Afternoon,
            16..=17 => HourRange::LateAfternoon,
            _ => HourRange::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HourRange::EarlyMorning => "6-9AM",
            HourRange::Morning => "9-11AM",
            HourRange::Midday => "11AM-2PM",
            HourRange::Afternoon => "2-4PM",
            HourRange::LateAfternoon => "4-6PM",
            HourRange::Evening => "6PM+",
        }
    }
}

/// The two busiest hour ranges by transaction count.
pub fn peak_hours(transactions: &[Transaction]) -> Vec<HourRange> {
    let mut counts = [0usize; 6];
    for t in transactions {
        counts[HourRange::from_hour(t.datetime.hour()) as usize] += 1;
    }
    let mut ranked: Vec<(HourRange, usize)> = HourRange::ALL
        .into_iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(2).map(|(r, _)| r).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub total_profit: Decimal,
    pub total_transactions: u32,
}

pub fn period_totals(summaries: &[DailySummary]) -> PeriodTotals {
    summaries.iter().fold(PeriodTotals::default(), |mut acc, s| {
        acc.total_revenue = acc.total_revenue.saturating_add(s.total_sales);
        acc.total_expenses = acc.total_expenses.saturating_add(s.total_expenses);
        acc.total_profit = acc.total_profit.saturating_add(s.net_profit);
        acc.total_transactions += s.transaction_count;
        acc
    })
}

pub fn expense_ratio(summaries: &[DailySummary]) -> f64 {
    let t = period_totals(summaries);
    percent(t.total_expenses, t.total_revenue)
}

pub fn profit_margin(summaries: &[DailySummary]) -> f64 {
    let t = period_totals(summaries);
    percent(t.total_revenue.saturating_sub(t.total_expenses), t.total_revenue)
}

pub fn daily_transaction_average(summaries: &[DailySummary]) -> f64 {
    if summaries.is_empty() {
        return 0.0;
    }
    period_totals(summaries).total_transactions as f64 / summaries.len() as f64
}

/// Sales of the newest 7 recorded days against the oldest 7.
///
/// `None` until at least 7 days have been recorded.
pub fn monthly_growth(summaries: &[DailySummary]) -> Option<f64> {
    if summaries.len() < 7 {
        return None;
    }
    let mut ordered: Vec<&DailySummary> = summaries.iter().collect();
    ordered.sort_by(|a, b| a.date_key.cmp(&b.date_key));
    let sales = |days: &[&DailySummary]| {
        days.iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.total_sales))
    };
    let first = sales(&ordered[..7]);
    let last = sales(&ordered[ordered.len() - 7..]);
    Some(percent(last.saturating_sub(first), first))
}

/// The single day with the most sales; earlier entries win ties.
pub fn best_day_summary(summaries: &[DailySummary]) -> Option<&DailySummary> {
    summaries.iter().fold(None, |best: Option<&DailySummary>, s| match best {
        Some(b) if s.total_sales <= b.total_sales => Some(b),
        _ => Some(s),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub trend: PerformanceTrend,
    pub weekly_growth: f64,
    pub revenue_consistency: f64,
    pub best_performing_day: Option<String>,
    pub average_service_value: Decimal,
    pub service_distribution: Vec<ServiceShare>,
    pub peak_hours: Vec<HourRange>,
    pub daily_transaction_average: f64,
    pub expense_ratio: f64,
    pub profit_margin: f64,
    pub monthly_growth: Option<f64>,
    pub totals: PeriodTotals,
}

pub fn dashboard(
    summaries: &[DailySummary],
    transactions: &[Transaction],
    services: &[Service],
) -> DashboardMetrics {
    let trend = weekly_trend(summaries);
    DashboardMetrics {
        weekly_growth: trend.growth_percentage,
        revenue_consistency: trend.consistency_score,
        best_performing_day: best_performing_day(summaries).map(|d| weekday_name(d).to_string()),
        average_service_value: average_service_value(transactions),
        service_distribution: service_distribution(transactions, services),
        peak_hours: peak_hours(transactions),
        daily_transaction_average: daily_transaction_average(summaries),
        expense_ratio: expense_ratio(summaries),
        profit_margin: profit_margin(summaries),
        monthly_growth: monthly_growth(summaries),
        totals: period_totals(summaries),
        trend,
    }
}
