// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ExpensePatch, ExpenseRecord, NewExpense};
use crate::store::LedgerStore;
use crate::utils::{
    expense_table, fmt_amount, maybe_print_json, parse_date, parse_decimal, required,
};
use anyhow::{Context, Result, bail};

pub fn handle(store: &dyn LedgerStore, name: &str, sub: &clap::ArgMatches) -> Result<()> {
    match name {
        "add" => add(store, sub),
        "list" => list(store, sub),
        "show" => show(store, sub),
        "rm" => remove(store, sub),
        "edit" => edit(store, sub),
        other => bail!("Unknown expense command '{}'", other),
    }
}

fn add(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let record = store.insert(new_expense_from(sub)?)?;
    println!(
        "Recorded #{} {} on {} ({})",
        record.id,
        fmt_amount(&record.amount),
        record.expense_date,
        record.category
    );
    Ok(())
}

pub fn new_expense_from(sub: &clap::ArgMatches) -> Result<NewExpense> {
    let date = parse_date(required(sub, "date")?)?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let category = required(sub, "category")?;
    let note = sub.get_one::<String>("note").cloned().unwrap_or_default();
    Ok(NewExpense::new(date, amount, category.as_str(), note))
}

fn list(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        if data.is_empty() {
            println!("No expenses found");
        } else {
            println!("{}", expense_table(&data));
        }
    }
    Ok(())
}

/// Records selected by the `list` filters, ordered by date then id.
pub fn query_rows(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRecord>> {
    let mut data = if let Some(d) = sub.get_one::<String>("date") {
        store.get_by_date(parse_date(d)?)?
    } else if let (Some(from), Some(to)) =
        (sub.get_one::<String>("from"), sub.get_one::<String>("to"))
    {
        store.get_by_date_range(parse_date(from)?, parse_date(to)?)?
    } else {
        store.get_all()?
    };
    if let Some(cat) = sub.get_one::<String>("category") {
        data.retain(|r| &r.category == cat);
    }
    data.sort_by_key(|r| (r.expense_date, r.id));
    Ok(data)
}

fn show(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<i64>("id").copied().context("Missing argument 'id'")?;
    match store.get_by_id(id)? {
        Some(record) => {
            if !maybe_print_json(sub.get_flag("json"), false, &record)? {
                println!("{}", expense_table(std::slice::from_ref(&record)));
            }
        }
        None => println!("No expense with id {}", id),
    }
    Ok(())
}

fn remove(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    if let Some(id) = sub.get_one::<i64>("id") {
        if store.delete_by_id(*id)? {
            println!("Removed expense #{}", id);
        } else {
            println!("No expense with id {}", id);
        }
    } else {
        let date = parse_date(required(sub, "date")?)?;
        let n = store.delete_by_date(date)?;
        println!("Removed {} expense(s) dated {}", n, date);
    }
    Ok(())
}

pub fn patch_from(sub: &clap::ArgMatches) -> Result<ExpensePatch> {
    Ok(ExpensePatch {
        expense_date: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        notes: sub.get_one::<String>("note").cloned(),
    })
}

fn edit(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<i64>("id").copied().context("Missing argument 'id'")?;
    let patch = patch_from(sub)?;
    if patch.is_empty() {
        bail!("Nothing to change; pass --date, --amount, --category or --note");
    }
    match store.update(id, &patch)? {
        Some(r) => println!(
            "Updated #{}: {} on {} ({})",
            r.id,
            fmt_amount(&r.amount),
            r.expense_date,
            r.category
        ),
        None => println!("No expense with id {}", id),
    }
    Ok(())
}
