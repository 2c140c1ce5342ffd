// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::preferences;
use crate::utils::{maybe_print_json, pretty_table, required_arg};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let p = preferences::get_user_preferences(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
                let rows = vec![
                    vec!["theme".into(), p.theme.clone()],
                    vec!["currency".into(), p.currency.clone()],
                    vec!["businessName".into(), p.business_name.clone()],
                    vec!["businessType".into(), p.business_type.clone()],
                    vec!["defaultCategories".into(), p.default_categories.join(", ")],
                    vec![
                        "notificationEnabled".into(),
                        p.notification_enabled.to_string(),
                    ],
                ];
                println!("{}", pretty_table(&["Preference", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let key = required_arg(sub, "key")?;
            let value = required_arg(sub, "value")?;
            preferences::set_preference(conn, key, value)?;
            println!("Set {} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
