// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregations over a loaded ledger. Every function is a linear scan over
//! the records it is given; stores call these after loading.

use std::collections::BTreeMap;

use chrono::{Datelike, Month, NaiveDate};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{CategoryTotal, ExpenseRecord, MonthTotal};

pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), LedgerError> {
    if start > end {
        return Err(LedgerError::validation(format!(
            "range start {} is after end {}",
            start, end
        )));
    }
    Ok(())
}

/// Records with `start <= expense_date <= end`, ordered by date then id.
pub fn filter_range(
    records: &[ExpenseRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ExpenseRecord> {
    let mut out: Vec<ExpenseRecord> = records
        .iter()
        .filter(|r| r.expense_date >= start && r.expense_date <= end)
        .cloned()
        .collect();
    out.sort_by_key(|r| (r.expense_date, r.id));
    out
}

/// Per-category sums over the inclusive range, sorted by category.
/// Categories without records in the range are absent. Fails instead of
/// wrapping when a sum leaves the `Decimal` range.
pub fn category_totals(
    records: &[ExpenseRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CategoryTotal>, LedgerError> {
    let mut agg: BTreeMap<&str, Decimal> = BTreeMap::new();
    for r in records
        .iter()
        .filter(|r| r.expense_date >= start && r.expense_date <= end)
    {
        let total = agg.entry(r.category.as_str()).or_insert(Decimal::ZERO);
        *total = add_amount(*total, r.amount, || format!("category '{}'", r.category))?;
    }
    let mut grand = Decimal::ZERO;
    for total in agg.values() {
        grand = add_amount(grand, *total, || format!("range {}..={}", start, end))?;
    }
    agg.into_iter()
        .map(|(category, total)| {
            Ok(CategoryTotal {
                category: category.to_string(),
                total,
                percentage: percentage_of(total, grand)?,
            })
        })
        .collect()
}

/// Per-month sums for `year`, ascending by month. Empty months are absent.
pub fn month_totals(
    records: &[ExpenseRecord],
    year: i32,
) -> Result<Vec<MonthTotal>, LedgerError> {
    let mut agg: BTreeMap<u32, Decimal> = BTreeMap::new();
    for r in records.iter().filter(|r| r.expense_date.year() == year) {
        let month = r.expense_date.month();
        let total = agg.entry(month).or_insert(Decimal::ZERO);
        *total = add_amount(*total, r.amount, || format!("{} {}", month_name(month), year))?;
    }
    Ok(agg
        .into_iter()
        .map(|(month, total)| MonthTotal {
            month,
            name: month_name(month).to_string(),
            total,
        })
        .collect())
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name())
}

fn add_amount(
    acc: Decimal,
    amount: Decimal,
    what: impl FnOnce() -> String,
) -> Result<Decimal, LedgerError> {
    acc.checked_add(amount)
        .ok_or_else(|| LedgerError::validation(format!("total for {} overflows", what())))
}

// part <= whole, so the quotient is at most one and scaling it cannot overflow.
fn percentage_of(part: Decimal, whole: Decimal) -> Result<Decimal, LedgerError> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(2))
        .ok_or_else(|| LedgerError::validation("category share cannot be computed"))
}
