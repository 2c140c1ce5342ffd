// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use saloonlite::commands::{dashboard, exporter, transactions};
use saloonlite::models::{NewTransaction, PaymentMethod};
use saloonlite::{cli, db, summary};
use serde_json::json;
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    for i in 1..=3 {
        let when = NaiveDate::from_ymd_opt(2025, 1, i)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        summary::add_transaction(
            &mut conn,
            NewTransaction::sale(Decimal::from(10 * i), when, "Yaw", "Haircut"),
        )
        .unwrap();
    }
    let when = NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_opt(16, 0, 0)
        .unwrap();
    summary::add_transaction(
        &mut conn,
        NewTransaction::expense(
            "12.34".parse().unwrap(),
            when,
            "Supplies",
            "Corner Shop",
            "Weekly run",
            PaymentMethod::Cash,
        ),
    )
    .unwrap();
    conn
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["saloonlite", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].datetime, "2025-01-03 10:00");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_day_and_type() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "saloonlite", "tx", "list", "--date", "2025-01-02", "--type", "expense",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].kind, "expense");
    assert_eq!(rows[0].party, "Corner Shop");
    assert_eq!(rows[0].method, "cash");
}

#[test]
fn export_transactions_writes_json() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "saloonlite",
        "export",
        "transactions",
        "--format",
        "json",
        "--from",
        "2025-01-02",
        "--to",
        "2025-01-02",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["type"], json!("sale"));
    assert_eq!(items[0]["amount"], json!("20"));
    assert_eq!(
        items[1],
        json!({
            "id": items[1]["id"].clone(),
            "date": "2025-01-02",
            "time": "16:00:00",
            "type": "expense",
            "amount": "12.34",
            "party": "Corner Shop",
            "item": "Supplies",
            "method": "cash",
            "note": "Weekly run"
        })
    );
}

#[test]
fn export_transactions_writes_csv() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "saloonlite", "export", "transactions", "--out", &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[1], "date");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 4);
    assert_eq!(&records[0][1], "2025-01-01");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "saloonlite",
        "export",
        "transactions",
        "--format",
        "xml",
        "--out",
        &out_str,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        assert!(exporter::handle(&conn, export_m).is_err());
    } else {
        panic!("no export subcommand");
    }
    assert!(!out_path.exists());
}

#[test]
fn dashboard_window_covers_recent_days() {
    let conn = setup();
    let today = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
    let m = dashboard::metrics(&conn, today, 2).unwrap();
    assert_eq!(m.totals.total_revenue, Decimal::from(50));
    assert_eq!(m.totals.total_transactions, 3);
    assert_eq!(m.service_distribution.len(), 1);
    assert_eq!(m.service_distribution[0].service, "Other");
}

#[test]
fn global_db_flag_parses_anywhere() {
    let matches = cli::build_cli().get_matches_from([
        "saloonlite", "summary", "day", "--db", "/tmp/x.sqlite", "--json",
    ]);
    assert_eq!(
        matches.get_one::<String>("db").map(String::as_str),
        Some("/tmp/x.sqlite")
    );
}
