// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{StoreError, StoreResult};
use crate::models::Service;
use crate::store::{self, Index};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

pub fn new_service(name: &str, price: Decimal, now: NaiveDateTime) -> StoreResult<Service> {
    let service = Service {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        price,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    check(&service)?;
    Ok(service)
}

fn check(service: &Service) -> StoreResult<()> {
    if service.name.trim().is_empty() {
        return Err(StoreError::Validation("service name must not be blank".into()));
    }
    if service.price < Decimal::ZERO {
        return Err(StoreError::Validation(format!(
            "service price must not be negative (got {})",
            service.price
        )));
    }
    Ok(())
}

/// Upserts `service`, stamping `updatedAt`.
pub fn save_service(conn: &Connection, service: &Service, now: NaiveDateTime) -> StoreResult<Service> {
    let mut saved = service.clone();
    saved.name = saved.name.trim().to_string();
    saved.updated_at = now;
    check(&saved)?;
    store::put(conn, &saved)?;
    info!(id = %saved.id, name = %saved.name, active = saved.is_active, "service saved");
    Ok(saved)
}

/// Every service, sorted by name ignoring case.
pub fn get_services(conn: &Connection) -> StoreResult<Vec<Service>> {
    let mut services = store::get_all::<Service>(conn)?;
    sort_by_name(&mut services);
    Ok(services)
}

pub fn get_active_services(conn: &Connection) -> StoreResult<Vec<Service>> {
    let mut services = store::range_scan::<Service>(conn, Index::IsActive, "1", "1")?;
    sort_by_name(&mut services);
    Ok(services)
}

fn sort_by_name(services: &mut [Service]) {
    services.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}

pub fn get_service(conn: &Connection, id: &str) -> StoreResult<Option<Service>> {
    store::get::<Service>(conn, id)
}

/// Case-insensitive lookup on the trimmed name.
pub fn find_by_name(conn: &Connection, name: &str) -> StoreResult<Option<Service>> {
    let wanted = name.trim().to_lowercase();
    Ok(get_services(conn)?
        .into_iter()
        .find(|s| s.name.trim().to_lowercase() == wanted))
}

/// Whether another service already uses `name`. Advisory: storage accepts duplicates.
pub fn name_taken(conn: &Connection, name: &str, except_id: Option<&str>) -> StoreResult<bool> {
    let wanted = name.trim().to_lowercase();
    Ok(get_services(conn)?
        .iter()
        .any(|s| s.name.trim().to_lowercase() == wanted && Some(s.id.as_str()) != except_id))
}

/// Soft-enables or disables a service. Returns `None` if the id is unknown.
pub fn set_active(
    conn: &Connection,
    id: &str,
    active: bool,
    now: NaiveDateTime,
) -> StoreResult<Option<Service>> {
    match get_service(conn, id)? {
        Some(mut s) => {
            s.is_active = active;
            save_service(conn, &s, now).map(Some)
        }
        None => Ok(None),
    }
}

pub fn delete_service(conn: &Connection, id: &str) -> StoreResult<bool> {
    let removed = store::delete::<Service>(conn, id)?;
    if removed {
        info!(id, "service deleted");
    }
    Ok(removed)
}
