// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::utils::required;
use anyhow::{Result, bail};

pub fn handle(store: &dyn LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let mut records = store.get_all()?;
    records.sort_by_key(|r| (r.expense_date, r.id));

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["id", "expense_date", "amount", "category", "notes"])?;
        for r in &records {
            wtr.write_record([
                r.id.to_string(),
                r.expense_date.to_string(),
                r.amount.to_string(),
                r.category.clone(),
                r.notes.clone(),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&records)?)?;
    }
    println!("Exported {} expense(s) to {}", records.len(), out);
    Ok(())
}
