// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::summary::current_year;
use crate::utils::{fmt_amount, maybe_print_json, parse_date, pretty_table, required};
use anyhow::Result;

pub fn handle(store: &dyn LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("by-category", sub)) => by_category(store, sub)?,
        Some(("by-month", sub)) => by_month(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn by_category(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let from = parse_date(required(sub, "from")?)?;
    let to = parse_date(required(sub, "to")?)?;
    let data = store.summarize_by_date_range(from, to)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No expenses between {} and {}", from, to);
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_amount(&c.total),
                format!("{:.2}%", c.percentage),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Total", "Share"], rows));
    Ok(())
}

fn by_month(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let year = sub.get_one::<i32>("year").copied().unwrap_or_else(current_year);
    let data = store.summarize_by_month(year)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No expenses in {}", year);
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|m| vec![m.name.clone(), fmt_amount(&m.total)])
        .collect();
    println!("{}", pretty_table(&["Month", "Total"], rows));
    Ok(())
}
