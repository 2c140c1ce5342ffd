// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{StoreError, StoreResult};
use crate::models::{AppSettings, UserPreferences};
use crate::store::{self, APP_SETTINGS_KEY, PREFERENCES_KEY};
use rusqlite::Connection;

pub fn get_user_preferences(conn: &Connection) -> StoreResult<UserPreferences> {
    Ok(store::get::<UserPreferences>(conn, PREFERENCES_KEY)?.unwrap_or_default())
}

pub fn save_user_preferences(conn: &Connection, prefs: &UserPreferences) -> StoreResult<()> {
    store::put(conn, prefs)
}

pub fn get_app_settings(conn: &Connection) -> StoreResult<AppSettings> {
    Ok(store::get::<AppSettings>(conn, APP_SETTINGS_KEY)?.unwrap_or_default())
}

pub fn save_app_settings(conn: &Connection, settings: &AppSettings) -> StoreResult<()> {
    store::put(conn, settings)
}

/// Sets one preference field by its wire name, e.g. `currency` or `businessName`.
pub fn set_preference(conn: &Connection, field: &str, value: &str) -> StoreResult<UserPreferences> {
    let mut prefs = get_user_preferences(conn)?;
    let value = value.trim();
    match field {
        "theme" => prefs.theme = value.to_string(),
        "currency" => prefs.currency = value.to_uppercase(),
        "businessName" | "business-name" => prefs.business_name = value.to_string(),
        "businessType" | "business-type" => prefs.business_type = value.to_string(),
        "defaultCategories" | "default-categories" => {
            prefs.default_categories = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        }
        "notificationEnabled" | "notifications" => {
            prefs.notification_enabled = parse_bool(value)?;
        }
        other => {
            return Err(StoreError::Validation(format!(
                "unknown preference '{}'",
                other
            )));
        }
    }
    save_user_preferences(conn, &prefs)?;
    Ok(prefs)
}

fn parse_bool(s: &str) -> StoreResult<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(StoreError::Validation(format!("expected true/false, got '{}'", s))),
    }
}
