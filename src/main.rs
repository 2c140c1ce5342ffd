// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use saloonlite::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init(matches.get_flag("verbose"));
    let db_flag = matches.get_one::<String>("db").map(|s| s.as_str());
    let mut conn = db::open_or_init(db_flag)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::resolve_path(db_flag)?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, sub)?,
        Some(("summary", sub)) => commands::summaries::handle(&conn, sub)?,
        Some(("service", sub)) => commands::services::handle(&conn, sub)?,
        Some(("pin", sub)) => commands::pin::handle(&conn, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&conn, sub)?,
        Some(("backup", sub)) => commands::backup::handle(&mut conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("prefs", sub)) => commands::prefs::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&mut conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
