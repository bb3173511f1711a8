// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn date_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).value_name("YYYY-MM-DD").help(help)
}

pub fn build_cli() -> Command {
    Command::new("expensebook")
        .version(clap::crate_version!())
        .about("Single-file expense ledger with category and month reports")
        .arg(
            Arg::new("file")
                .long("file")
                .short('f')
                .global(true)
                .env("EXPENSEBOOK_FILE")
                .value_name("PATH")
                .help("Ledger file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .global(true)
                .env("EXPENSEBOOK_BACKEND")
                .value_parser(["json", "sqlite"])
                .help("Storage backend (inferred from the file extension if omitted)"),
        )
        .arg(
            Arg::new("lenient-reads")
                .long("lenient-reads")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Answer queries with empty results when the ledger cannot be read"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log every ledger operation to stderr"),
        )
        .subcommand(Command::new("init").about("Create an empty ledger if none exists"))
        .subcommand(
            Command::new("add")
                .about("Record an expense")
                .arg(date_arg("date", "Expense date").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List expenses")
                .arg(date_arg("date", "Only this date").conflicts_with_all(["from", "to"]))
                .arg(date_arg("from", "Range start (inclusive)").requires("to"))
                .arg(date_arg("to", "Range end (inclusive)").requires("from"))
                .arg(Arg::new("category").long("category")),
        ))
        .subcommand(
            Command::new("show")
                .about("Show one expense")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete expenses by date or by id")
                .arg(date_arg("date", "Delete every expense on this date"))
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_parser(value_parser!(i64)),
                )
                .group(
                    clap::ArgGroup::new("target")
                        .args(["date", "id"])
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of an expense")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(date_arg("date", "New date"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("note").long("note")),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregate expenses")
                .subcommand_required(true)
                .subcommand(json_flags(
                    Command::new("by-category")
                        .about("Totals per category over a date range")
                        .arg(date_arg("from", "Range start (inclusive)").required(true))
                        .arg(date_arg("to", "Range end (inclusive)").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("by-month")
                        .about("Totals per month for a year")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32))
                                .help("Defaults to the current year"),
                        ),
                )),
        )
        .subcommand(
            Command::new("import")
                .about("Import expenses from CSV (date,amount,category,notes)")
                .arg(Arg::new("path").required(true))
                .arg(
                    Arg::new("replace")
                        .long("replace")
                        .action(ArgAction::SetTrue)
                        .help("Replace existing expenses on every date in the file"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export all expenses")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for problems"))
}
