// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::backup;
use crate::utils::required_arg;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("export", sub)) => {
            let out = required_arg(sub, "out")?;
            let json = backup::export_json(conn)?;
            std::fs::write(out, json).with_context(|| format!("Writing {}", out))?;
            println!("Backup written to {}", out);
        }
        Some(("import", sub)) => {
            let path = required_arg(sub, "path")?;
            let json =
                std::fs::read_to_string(path).with_context(|| format!("Reading {}", path))?;
            let counts = backup::import_json(conn, &json)?;
            println!(
                "Restored {} service(s), {} transaction(s), {} summaries",
                counts.services, counts.transactions, counts.summaries
            );
        }
        Some(("clear", sub)) => {
            if !sub.get_flag("yes") {
                bail!("Refusing to delete all data without --yes");
            }
            backup::clear_all(conn)?;
            println!("All data cleared");
        }
        _ => {}
    }
    Ok(())
}
