// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog;
use crate::models::Service;
use crate::preferences::get_user_preferences;
use crate::utils::{
    fmt_money, maybe_print_json, now, optional_arg, parse_decimal, pretty_table, required_arg,
};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required_arg(sub, "name")?;
            let price = parse_decimal(required_arg(sub, "price")?)?;
            if catalog::name_taken(conn, name, None)? {
                bail!("A service named '{}' already exists", name.trim());
            }
            let at = now();
            let service = catalog::new_service(name, price, at)?;
            let saved = catalog::save_service(conn, &service, at)?;
            println!("Added service '{}' at {}", saved.name, saved.price);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => {
            let mut service = resolve(conn, required_arg(sub, "service")?)?;
            if let Some(name) = optional_arg(sub, "rename") {
                if catalog::name_taken(conn, name, Some(&service.id))? {
                    bail!("A service named '{}' already exists", name);
                }
                service.name = name.to_string();
            }
            if let Some(price) = optional_arg(sub, "price") {
                service.price = parse_decimal(price)?;
            }
            let saved = catalog::save_service(conn, &service, now())?;
            println!("Updated service '{}' ({})", saved.name, saved.price);
        }
        Some(("toggle", sub)) => {
            let service = resolve(conn, required_arg(sub, "service")?)?;
            let updated = catalog::set_active(conn, &service.id, !service.is_active, now())?
                .with_context(|| format!("Service '{}' disappeared", service.name))?;
            let status = if updated.is_active { "enabled" } else { "disabled" };
            println!("Service '{}' {}", updated.name, status);
        }
        Some(("rm", sub)) => {
            let service = resolve(conn, required_arg(sub, "service")?)?;
            catalog::delete_service(conn, &service.id)?;
            println!("Removed service '{}'", service.name);
        }
        _ => {}
    }
    Ok(())
}

fn resolve(conn: &Connection, name_or_id: &str) -> Result<Service> {
    if let Some(s) = catalog::find_by_name(conn, name_or_id)? {
        return Ok(s);
    }
    catalog::get_service(conn, name_or_id.trim())?
        .with_context(|| format!("Service '{}' not found", name_or_id))
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let services = if sub.get_flag("all") {
        catalog::get_services(conn)?
    } else {
        catalog::get_active_services(conn)?
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &services)? {
        let ccy = get_user_preferences(conn)?.currency;
        let rows = services
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    fmt_money(&s.price, &ccy),
                    if s.is_active { "yes" } else { "no" }.to_string(),
                    s.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Service", "Price", "Active", "Updated"], rows)
        );
    }
    Ok(())
}
