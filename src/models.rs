// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{StoreError, StoreResult};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp fields read both naive local values and RFC 3339 strings with an
/// offset or `Z`; the latter are taken as UTC, the clock backup dates are keyed on.
mod iso {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_utc());
        }
        s.parse::<NaiveDateTime>().ok()
    }

    pub fn datetime<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(d)?;
        parse_datetime(&s).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", s)))
    }

    pub fn opt_datetime<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(s) => parse_datetime(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", s))),
            None => Ok(None),
        }
    }

    /// `YYYY-MM-DD`, or the date part of a full timestamp.
    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(d)?;
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .ok()
            .or_else(|| parse_datetime(&s).map(|dt| dt.date()))
            .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", s)))
    }
}

/// Calendar-day partition key, `YYYY-MM-DD`.
pub fn date_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sale,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sale" | "sales" => Ok(TransactionType::Sale),
            "expense" | "expenses" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    #[serde(alias = "mobile money")]
    MobileMoney,
    #[serde(alias = "bank transfer")]
    BankTransfer,
    #[serde(alias = "credit card")]
    CreditCard,
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::MobileMoney,
        PaymentMethod::BankTransfer,
        PaymentMethod::CreditCard,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::MobileMoney => "mobile-money",
            PaymentMethod::BankTransfer => "bank-transfer",
            PaymentMethod::CreditCard => "credit-card",
            PaymentMethod::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == norm)
            .ok_or_else(|| format!("unknown payment method '{}'", s.trim()))
    }
}

/// Variant-specific fields; `type` on the wire selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionDetail {
    Sale {
        #[serde(default)]
        customer: String,
        #[serde(default)]
        service: String,
    },
    Expense {
        #[serde(default)]
        category: String,
        // the vendor shares the `service` field with sales
        #[serde(rename = "service", default)]
        vendor: String,
        #[serde(default)]
        description: String,
        #[serde(rename = "paymentMethod", default)]
        payment_method: PaymentMethod,
    },
}

impl TransactionDetail {
    pub fn kind(&self) -> TransactionType {
        match self {
            TransactionDetail::Sale { .. } => TransactionType::Sale,
            TransactionDetail::Expense { .. } => TransactionType::Expense,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    #[serde(deserialize_with = "iso::datetime")]
    pub datetime: NaiveDateTime,
    pub date_key: String,
    #[serde(flatten)]
    pub detail: TransactionDetail,
}

impl Transaction {
    /// Stamps an id and the partition key onto a new entry.
    pub fn from_new(id: String, new: NewTransaction) -> Self {
        Transaction {
            id,
            amount: new.amount,
            date_key: date_key(new.datetime.date()),
            datetime: new.datetime,
            detail: new.detail,
        }
    }

    pub fn kind(&self) -> TransactionType {
        self.detail.kind()
    }

    pub fn is_sale(&self) -> bool {
        self.kind() == TransactionType::Sale
    }

    /// The service a sale was rung up against, if any.
    pub fn service_name(&self) -> Option<&str> {
        match &self.detail {
            TransactionDetail::Sale { service, .. } if !service.trim().is_empty() => {
                Some(service.as_str())
            }
            _ => None,
        }
    }
}

/// A transaction before it has been assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub datetime: NaiveDateTime,
    pub detail: TransactionDetail,
}

impl NewTransaction {
    pub fn sale(amount: Decimal, datetime: NaiveDateTime, customer: &str, service: &str) -> Self {
        NewTransaction {
            amount,
            datetime,
            detail: TransactionDetail::Sale {
                customer: customer.trim().to_string(),
                service: service.trim().to_string(),
            },
        }
    }

    pub fn expense(
        amount: Decimal,
        datetime: NaiveDateTime,
        category: &str,
        vendor: &str,
        description: &str,
        payment_method: PaymentMethod,
    ) -> Self {
        NewTransaction {
            amount,
            datetime,
            detail: TransactionDetail::Expense {
                category: category.trim().to_string(),
                vendor: vendor.trim().to_string(),
                description: description.trim().to_string(),
                payment_method,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date_key: String,
    #[serde(deserialize_with = "iso::date")]
    pub date: NaiveDate,
    pub total_sales: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub transaction_count: u32,
}

impl DailySummary {
    pub fn empty(day: NaiveDate) -> Self {
        DailySummary {
            date_key: date_key(day),
            date: day,
            total_sales: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            transaction_count: 0,
        }
    }

    /// Adds one transaction to the running totals. Leaves `self` untouched and
    /// fails if a total would leave the representable range.
    pub fn fold(&mut self, kind: TransactionType, amount: Decimal) -> StoreResult<()> {
        let overflow = || {
            StoreError::Validation(format!(
                "{} {} would overflow the totals for {}",
                kind, amount, self.date_key
            ))
        };
        let (sales, expenses) = match kind {
            TransactionType::Sale => (
                self.total_sales.checked_add(amount).ok_or_else(overflow)?,
                self.total_expenses,
            ),
            TransactionType::Expense => (
                self.total_sales,
                self.total_expenses.checked_add(amount).ok_or_else(overflow)?,
            ),
        };
        let net = sales.checked_sub(expenses).ok_or_else(overflow)?;
        self.total_sales = sales;
        self.total_expenses = expenses;
        self.net_profit = net;
        self.transaction_count += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub is_active: bool,
    #[serde(deserialize_with = "iso::datetime")]
    pub created_at: NaiveDateTime,
    #[serde(deserialize_with = "iso::datetime")]
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinSettings {
    pub pin: String,
    pub is_enabled: bool,
    #[serde(deserialize_with = "iso::datetime")]
    pub created_at: NaiveDateTime,
    #[serde(deserialize_with = "iso::datetime")]
    pub last_modified: NaiveDateTime,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default, deserialize_with = "iso::opt_datetime")]
    pub last_attempt: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "iso::opt_datetime")]
    pub lock_until: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: String,
    pub currency: String,
    pub business_name: String,
    pub business_type: String,
    pub default_categories: Vec<String>,
    pub notification_enabled: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        UserPreferences {
            theme: "light".into(),
            currency: "GHS".into(),
            business_name: "My Saloon".into(),
            business_type: "Barber Shop".into(),
            default_categories: ["Haircut", "Beard Trim", "Hair Color", "Styling"]
                .into_iter()
                .map(String::from)
                .collect(),
            notification_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub version: String,
    pub first_launch: bool,
    pub onboarding_completed: bool,
    pub data_export_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            version: "1.0.0".into(),
            first_launch: true,
            onboarding_completed: false,
            data_export_format: "json".into(),
        }
    }
}
