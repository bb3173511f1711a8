// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::models::ExpenseRecord;
use crate::store::LedgerStore;
use crate::utils::{fmt_amount, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn handle(store: &dyn LedgerStore) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let rows = match store.get_all() {
        Ok(records) => check(&records, today),
        Err(err @ LedgerError::StorageCorrupt { .. }) => {
            vec![vec!["corrupt_ledger".into(), err.to_string()]]
        }
        Err(err) => return Err(err.into()),
    };

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Problems in an otherwise readable ledger, one `[issue, detail]` per row.
pub fn check(records: &[ExpenseRecord], today: NaiveDate) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for r in records {
        if r.amount < Decimal::ZERO {
            rows.push(vec![
                "negative_amount".into(),
                format!("#{} {}", r.id, fmt_amount(&r.amount)),
            ]);
        }
        if r.category.trim().is_empty() {
            rows.push(vec!["blank_category".into(), format!("#{}", r.id)]);
        }
        if r.expense_date > today {
            rows.push(vec![
                "future_date".into(),
                format!("#{} {}", r.id, r.expense_date),
            ]);
        }
    }
    rows
}
