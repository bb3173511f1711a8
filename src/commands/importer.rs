// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::NewExpense;
use crate::store::LedgerStore;
use crate::utils::{parse_date, parse_decimal, required};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::collections::BTreeMap;

pub fn handle(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let path = required(sub, "path")?.trim();
    let rows = read_rows(path)?;
    let count = rows.len();

    if sub.get_flag("replace") {
        let mut by_date: BTreeMap<NaiveDate, Vec<NewExpense>> = BTreeMap::new();
        for row in rows {
            by_date.entry(row.expense_date).or_default().push(row);
        }
        for (date, day) in by_date {
            store
                .replace_day(date, day)
                .with_context(|| format!("Replace expenses for {}", date))?;
        }
    } else {
        store
            .insert_many(rows)
            .with_context(|| format!("Import expenses from {}", path))?;
    }
    println!("Imported {} expense(s) from {}", count, path);
    Ok(())
}

/// Parses and validates every row before anything is written.
pub fn read_rows(path: &str) -> Result<Vec<NewExpense>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut out = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let amount_raw = rec.get(1).context("amount missing")?.trim();
        let category = rec.get(2).context("category missing")?.trim();
        let notes = rec.get(3).unwrap_or("").trim();

        let date = parse_date(date_raw).with_context(|| format!("Line {}", line))?;
        let amount = parse_decimal(amount_raw).with_context(|| format!("Line {}", line))?;
        let expense = NewExpense::new(date, amount, category, notes)
            .validated()
            .with_context(|| format!("Line {}", line))?;
        out.push(expense);
    }
    Ok(out)
}
