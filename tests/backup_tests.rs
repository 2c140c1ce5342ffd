// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use saloonlite::backup::{self, BACKUP_APP, BACKUP_VERSION};
use saloonlite::error::StoreError;
use saloonlite::models::{NewTransaction, PaymentMethod, UserPreferences};
use saloonlite::store::{self, Collection};
use saloonlite::{catalog, db, pin, preferences, summary};
use tempfile::tempdir;

fn seeded() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    let now = NaiveDate::from_ymd_opt(2024, 2, 10)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let haircut = catalog::new_service("Haircut", Decimal::from(25), now).unwrap();
    catalog::save_service(&conn, &haircut, now).unwrap();
    summary::add_transaction(
        &mut conn,
        NewTransaction::sale(Decimal::from(25), now, "Kofi", "Haircut"),
    )
    .unwrap();
    summary::add_transaction(
        &mut conn,
        NewTransaction::expense(
            "3.75".parse().unwrap(),
            now + chrono::Duration::hours(2),
            "Utilities",
            "ECG",
            "power",
            PaymentMethod::MobileMoney,
        ),
    )
    .unwrap();
    let prefs = UserPreferences {
        business_name: "Fade Masters".into(),
        ..Default::default()
    };
    preferences::save_user_preferences(&conn, &prefs).unwrap();
    conn
}

fn counts(conn: &Connection) -> Vec<usize> {
    Collection::EXPORTED
        .iter()
        .map(|c| store::count(conn, *c).unwrap())
        .collect()
}

#[test]
fn export_then_import_restores_everything() {
    let conn = seeded();
    let exported_at = Utc.with_ymd_and_hms(2024, 2, 11, 8, 0, 0).unwrap();
    let original = backup::export_all(&conn, exported_at).unwrap();
    assert_eq!(original.version, BACKUP_VERSION);
    assert_eq!(original.app, BACKUP_APP);
    assert_eq!(original.transactions.len(), 2);

    let dir = tempdir().unwrap();
    let path = dir.path().join("backup.json");
    std::fs::write(&path, serde_json::to_string_pretty(&original).unwrap()).unwrap();

    let mut fresh = db::open_in_memory().unwrap();
    let json = std::fs::read_to_string(&path).unwrap();
    let imported = backup::import_json(&mut fresh, &json).unwrap();
    assert_eq!(imported.transactions, 2);
    assert_eq!(imported.summaries, 1);

    let again = backup::export_all(&fresh, exported_at).unwrap();
    assert_eq!(again, original);
}

#[test]
fn decimals_export_as_strings_and_accept_numbers() {
    let conn = seeded();
    let json = backup::export_json(&conn).unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["services"][0]["price"], serde_json::json!("25"));
    assert_eq!(v["transactions"][0]["type"], serde_json::json!("sale"));
    assert_eq!(v["transactions"][1]["paymentMethod"], serde_json::json!("mobile-money"));

    let doc = r#"{
        "version": "1.0",
        "transactions": [{
            "id": "t1", "amount": 12.5, "datetime": "2024-03-01T10:00:00",
            "dateKey": "2024-03-01", "type": "sale", "customer": "", "service": "Styling"
        }]
    }"#;
    let mut target = db::open_in_memory().unwrap();
    let c = backup::import_json(&mut target, doc).unwrap();
    assert_eq!(c.transactions, 1);
    assert_eq!(c.services, 0);
    let t = store::get::<saloonlite::models::Transaction>(&target, "t1").unwrap().unwrap();
    assert_eq!(t.amount, "12.5".parse::<Decimal>().unwrap());
}

#[test]
fn malformed_import_leaves_store_untouched() {
    let mut conn = seeded();
    let before = counts(&conn);

    let err = backup::import_json(&mut conn, "{ not json").unwrap_err();
    assert!(matches!(err, StoreError::ImportFormat(_)));

    let err = backup::import_json(&mut conn, r#"{"version": "2.0"}"#).unwrap_err();
    assert!(matches!(err, StoreError::ImportFormat(_)));

    let mismatched = r#"{
        "version": "1.0",
        "transactions": [{
            "id": "t1", "amount": "5", "datetime": "2024-03-01T10:00:00",
            "dateKey": "2024-03-02", "type": "sale"
        }]
    }"#;
    assert!(matches!(
        backup::import_json(&mut conn, mismatched),
        Err(StoreError::ImportFormat(_))
    ));

    assert_eq!(counts(&conn), before);
}

#[test]
fn duplicate_keys_are_rejected_before_clearing() {
    let mut conn = seeded();
    let before = counts(&conn);
    let mut doc = backup::export_all(&conn, Utc::now()).unwrap();
    let dup = doc.transactions[0].clone();
    doc.transactions.push(dup);

    let err = backup::import_all(&mut conn, &doc).unwrap_err();
    assert!(matches!(err, StoreError::ImportFormat(_)));
    assert_eq!(counts(&conn), before);
}

#[test]
fn failure_mid_import_rolls_back() {
    let mut conn = seeded();
    let doc = backup::export_all(&conn, Utc::now()).unwrap();
    conn.execute_batch("DROP TABLE settings").unwrap();

    let res = backup::import_all(&mut conn, &doc);
    assert!(matches!(res, Err(StoreError::Io(_))));
    assert_eq!(store::count(&conn, Collection::Services).unwrap(), 1);
    assert_eq!(store::count(&conn, Collection::Transactions).unwrap(), 2);
    assert_eq!(store::count(&conn, Collection::Summaries).unwrap(), 1);
}

#[test]
fn clear_all_keeps_pin() {
    let mut conn = seeded();
    let now = chrono::Local::now().naive_local();
    pin::change_pin(&conn, pin::DEFAULT_PIN, "8642", now).unwrap();

    backup::clear_all(&mut conn).unwrap();
    assert!(counts(&conn).iter().all(|n| *n == 0));
    assert_eq!(pin::load(&conn).unwrap().unwrap().pin, "8642");
    assert_eq!(
        preferences::get_user_preferences(&conn).unwrap(),
        UserPreferences::default()
    );
}

#[test]
fn ledger_invariants_are_checked_before_clearing() {
    let mut conn = seeded();
    let before = counts(&conn);

    let negative = r#"{
        "version": "1.0",
        "transactions": [{
            "id": "t1", "amount": "-50", "datetime": "2024-03-01T10:00:00",
            "dateKey": "2024-03-01", "type": "sale"
        }]
    }"#;
    let off_net = r#"{
        "version": "1.0",
        "transactions": [{
            "id": "t1", "amount": "10", "datetime": "2024-03-01T10:00:00",
            "dateKey": "2024-03-01", "type": "sale"
        }],
        "summaries": [{
            "dateKey": "2024-03-01", "date": "2024-03-01", "totalSales": "10",
            "totalExpenses": "0", "netProfit": "999", "transactionCount": 1
        }]
    }"#;
    let off_count = r#"{
        "version": "1.0",
        "transactions": [{
            "id": "t1", "amount": "10", "datetime": "2024-03-01T10:00:00",
            "dateKey": "2024-03-01", "type": "sale"
        }],
        "summaries": [{
            "dateKey": "2024-03-01", "date": "2024-03-01", "totalSales": "10",
            "totalExpenses": "0", "netProfit": "10", "transactionCount": 7
        }]
    }"#;
    let orphan_day = r#"{
        "version": "1.0",
        "summaries": [{
            "dateKey": "2024-03-05", "date": "2024-03-05", "totalSales": "40",
            "totalExpenses": "0", "netProfit": "40", "transactionCount": 2
        }]
    }"#;
    for doc in [negative, off_net, off_count, orphan_day] {
        let err = backup::import_json(&mut conn, doc).unwrap_err();
        assert!(matches!(err, StoreError::ImportFormat(_)), "{doc}");
        assert_eq!(counts(&conn), before);
    }
}

#[test]
fn missing_summaries_are_rebuilt_on_import() {
    let doc = r#"{
        "version": "1.0",
        "transactions": [
            {"id": "t1", "amount": "30", "datetime": "2024-03-01T10:00:00",
             "dateKey": "2024-03-01", "type": "sale", "service": "Braids"},
            {"id": "t2", "amount": "12", "datetime": "2024-03-01T15:00:00",
             "dateKey": "2024-03-01", "type": "expense", "category": "Supplies"}
        ]
    }"#;
    let mut conn = db::open_in_memory().unwrap();
    let c = backup::import_json(&mut conn, doc).unwrap();
    assert_eq!(c.summaries, 1);

    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let s = saloonlite::queries::get_daily_summary(&conn, day).unwrap();
    assert_eq!(s.total_sales, Decimal::from(30));
    assert_eq!(s.net_profit, Decimal::from(18));
    assert_eq!(s.transaction_count, 2);
    assert!(summary::find_drift(&conn).unwrap().is_empty());
}

#[test]
fn browser_exported_backup_restores() {
    // timestamps carry a UTC suffix and numbers are plain JSON numbers
    let doc = r#"{
        "services": [{
            "id": "lz1abc", "name": "Haircut", "price": 25, "isActive": true,
            "createdAt": "2024-02-28T09:00:00.000Z", "updatedAt": "2024-02-28T09:00:00.000Z"
        }],
        "transactions": [
            {"type": "sale", "amount": 25, "customer": "Ama", "service": "Haircut",
             "datetime": "2024-03-01T10:00:00.000Z", "id": "lz2def", "dateKey": "2024-03-01"},
            {"type": "expense", "amount": 4.5, "category": "Supplies", "service": "",
             "description": "", "paymentMethod": "cash",
             "datetime": "2024-03-01T18:30:00.000Z", "id": "lz3ghi", "dateKey": "2024-03-01"}
        ],
        "summaries": [{
            "date": "2024-03-01T00:00:00.000Z", "dateKey": "2024-03-01", "totalSales": 25,
            "totalExpenses": 4.5, "netProfit": 20.5, "transactionCount": 2
        }],
        "preferences": [{
            "theme": "light", "currency": "GHS", "businessName": "Fade",
            "businessType": "Barber Shop", "defaultCategories": [],
            "notificationEnabled": true, "id": "default"
        }],
        "settings": [{
            "version": "1.0.0", "firstLaunch": false, "onboardingCompleted": true,
            "dataExportFormat": "json", "id": "appSettings"
        }],
        "exportDate": "2024-03-02T08:00:00.000Z",
        "version": "1.0",
        "app": "SaloonLite"
    }"#;
    let mut conn = db::open_in_memory().unwrap();
    let c = backup::import_json(&mut conn, doc).unwrap();
    assert_eq!(c.transactions, 2);
    assert_eq!(c.services, 1);

    let t = store::get::<saloonlite::models::Transaction>(&conn, "lz2def")
        .unwrap()
        .unwrap();
    let ten = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    assert_eq!(t.datetime, ten);

    let s = saloonlite::queries::get_daily_summary(&conn, ten.date()).unwrap();
    assert_eq!(s.net_profit, "20.5".parse::<Decimal>().unwrap());
    assert_eq!(s.transaction_count, 2);
    assert_eq!(preferences::get_user_preferences(&conn).unwrap().business_name, "Fade");
}
