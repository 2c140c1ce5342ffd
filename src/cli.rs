// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn with_json(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

fn at_arg() -> Arg {
    Arg::new("at")
        .long("at")
        .value_name("WHEN")
        .help("When it happened (YYYY-MM-DD HH:MM); defaults to now")
}

fn day_range_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
}

fn service_ref() -> Arg {
    Arg::new("service")
        .required(true)
        .value_name("NAME_OR_ID")
        .help("Service name (case-insensitive) or id")
}

pub fn build_cli() -> Command {
    Command::new("saloonlite")
        .version(crate_version!())
        .about("Sales, expenses, and daily summaries for a small shop")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("Database file (overrides SALOONLITE_DB)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log progress to stderr"),
        )
        .subcommand(Command::new("init").about("Create the database if it does not exist"))
        .subcommand(
            Command::new("tx")
                .about("Record and list sales and expenses")
                .subcommand(
                    Command::new("add-sale")
                        .about("Record a sale")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .help("Defaults to the service's catalog price"),
                        )
                        .arg(Arg::new("service").long("service"))
                        .arg(Arg::new("customer").long("customer"))
                        .arg(at_arg()),
                )
                .subcommand(
                    Command::new("add-expense")
                        .about("Record an expense")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("vendor").long("vendor"))
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .default_value("cash")
                                .help("cash | mobile-money | bank-transfer | credit-card | other"),
                        )
                        .arg(at_arg()),
                )
                .subcommand(with_json(day_range_args(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(
                            Arg::new("today")
                                .long("today")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("type").long("type").help("sale | expense"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))),
        )
        .subcommand(
            Command::new("summary")
                .about("Daily summaries")
                .subcommand(with_json(
                    Command::new("day")
                        .about("One day's totals (zeroed if nothing was recorded)")
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
                ))
                .subcommand(with_json(day_range_args(
                    Command::new("history")
                        .about("Summaries over a window, latest first")
                        .arg(
                            Arg::new("filter")
                                .long("filter")
                                .default_value("this-week")
                                .help("today | this-week | this-month | all"),
                        ),
                ))),
        )
        .subcommand(
            Command::new("service")
                .about("Manage the service catalog")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("price").long("price").required(true)),
                )
                .subcommand(with_json(
                    Command::new("list").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include disabled services"),
                    ),
                ))
                .subcommand(
                    Command::new("edit")
                        .arg(service_ref())
                        .arg(Arg::new("rename").long("rename"))
                        .arg(Arg::new("price").long("price")),
                )
                .subcommand(
                    Command::new("toggle")
                        .about("Enable or disable a service")
                        .arg(service_ref()),
                )
                .subcommand(Command::new("rm").arg(service_ref())),
        )
        .subcommand(
            Command::new("pin")
                .about("PIN gate")
                .subcommand(Command::new("verify").arg(Arg::new("pin").required(true)))
                .subcommand(
                    Command::new("change")
                        .arg(Arg::new("current").long("current").required(true))
                        .arg(Arg::new("new").long("new").required(true))
                        .arg(Arg::new("confirm").long("confirm").required(true)),
                )
                .subcommand(with_json(Command::new("status")))
                .subcommand(Command::new("enable"))
                .subcommand(Command::new("disable")),
        )
        .subcommand(with_json(
            Command::new("dashboard")
                .about("Trends, service mix, and peak hours")
                .arg(
                    Arg::new("days")
                        .long("days")
                        .default_value("30")
                        .value_parser(value_parser!(u32)),
                ),
        ))
        .subcommand(
            Command::new("backup")
                .about("Whole-store backup and restore")
                .subcommand(Command::new("export").arg(Arg::new("out").long("out").required(true)))
                .subcommand(
                    Command::new("import").arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(
                    Command::new("clear")
                        .about("Delete all data")
                        .arg(Arg::new("yes").long("yes").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(
            Command::new("export").subcommand(day_range_args(
                Command::new("transactions")
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(Arg::new("out").long("out").required(true)),
            )),
        )
        .subcommand(
            Command::new("prefs")
                .about("Business preferences")
                .subcommand(with_json(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(with_json(
            Command::new("doctor")
                .about("Check summaries against the ledger")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Rebuild summaries from transactions"),
                ),
        ))
}
