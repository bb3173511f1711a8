// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use super::{LedgerStore, ReadPolicy, next_id};
use crate::error::LedgerError;
use crate::models::{ExpensePatch, ExpenseRecord, NewExpense};

const TMP_SUFFIX: &str = "tmp";

/// Ledger persisted as one JSON array, rewritten whole on every mutation.
///
/// Mutations hold an in-process writer lock across load, change and save, so
/// threads sharing a handle cannot lose each other's writes. Separate
/// processes writing the same file are not coordinated.
#[derive(Debug)]
pub struct JsonLedgerStore {
    path: PathBuf,
    read_policy: ReadPolicy,
    writer: Mutex<()>,
}

impl JsonLedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_read_policy(path, ReadPolicy::default())
    }

    pub fn with_read_policy(path: impl Into<PathBuf>, read_policy: ReadPolicy) -> Self {
        Self {
            path: path.into(),
            read_policy,
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    /// Writes an empty ledger if the document does not exist yet.
    pub fn init(&self) -> Result<(), LedgerError> {
        let _guard = self.lock();
        if self.path.exists() {
            return Ok(());
        }
        self.save(&[])
    }

    /// Reads the whole document. A missing or blank file is an empty ledger.
    pub fn load(&self) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                tracing::error!(path = %self.path.display(), error = %source, "failed to read ledger");
                return Err(self.unavailable(source));
            }
        };
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<ExpenseRecord> = serde_json::from_str(&data).map_err(|err| {
            tracing::error!(path = %self.path.display(), error = %err, "ledger document is malformed");
            self.corrupt(err.to_string())
        })?;
        if let Some(id) = duplicate_id(&records) {
            tracing::error!(path = %self.path.display(), id, "ledger document repeats an id");
            return Err(self.corrupt(format!("id {} appears more than once", id)));
        }
        Ok(records)
    }

    /// Replaces the document with `records` via a temp file and rename.
    pub fn save(&self, records: &[ExpenseRecord]) -> Result<(), LedgerError> {
        if let Some(id) = duplicate_id(records) {
            return Err(LedgerError::validation(format!(
                "id {} appears more than once",
                id
            )));
        }
        let body = serde_json::to_string_pretty(records)
            .map_err(|err| self.corrupt(format!("cannot serialize ledger: {}", err)))?;
        self.write_atomic(body.as_bytes()).map_err(|source| {
            tracing::error!(path = %self.path.display(), error = %source, "failed to save ledger");
            self.unavailable(source)
        })?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "ledger saved");
        Ok(())
    }

    fn write_atomic(&self, body: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(body)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)
    }

    fn query(&self, op: &str) -> Result<Vec<ExpenseRecord>, LedgerError> {
        self.read_policy.recover(op, self.load())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded state lives on disk, so a poisoned lock is still usable.
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn unavailable(&self, source: std::io::Error) -> LedgerError {
        LedgerError::StorageUnavailable {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: String) -> LedgerError {
        LedgerError::StorageCorrupt {
            path: self.path.clone(),
            reason,
        }
    }
}

impl LedgerStore for JsonLedgerStore {
    fn get_all(&self) -> Result<Vec<ExpenseRecord>, LedgerError> {
        tracing::info!("fetching all expenses");
        self.query("get_all")
    }

    fn get_by_date(&self, date: NaiveDate) -> Result<Vec<ExpenseRecord>, LedgerError> {
        tracing::info!(%date, "fetching expenses for date");
        Ok(self
            .query("get_by_date")?
            .into_iter()
            .filter(|r| r.expense_date == date)
            .collect())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<ExpenseRecord>, LedgerError> {
        tracing::info!(id, "fetching expense by id");
        Ok(self.query("get_by_id")?.into_iter().find(|r| r.id == id))
    }

    fn insert(&self, expense: NewExpense) -> Result<ExpenseRecord, LedgerError> {
        let expense = expense.validated()?;
        tracing::info!(date = %expense.expense_date, amount = %expense.amount, category = %expense.category, "inserting expense");
        let _guard = self.lock();
        let mut records = self.load()?;
        let record = ExpenseRecord::from_new(next_id(&records), expense);
        records.push(record.clone());
        self.save(&records)?;
        Ok(record)
    }

    fn insert_many(&self, expenses: Vec<NewExpense>) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let expenses = expenses
            .into_iter()
            .map(NewExpense::validated)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = expenses.len(), "inserting expenses");
        let _guard = self.lock();
        let mut records = self.load()?;
        let first = next_id(&records);
        let inserted: Vec<ExpenseRecord> = expenses
            .into_iter()
            .zip(first..)
            .map(|(expense, id)| ExpenseRecord::from_new(id, expense))
            .collect();
        records.extend(inserted.iter().cloned());
        self.save(&records)?;
        Ok(inserted)
    }

    fn delete_by_date(&self, date: NaiveDate) -> Result<usize, LedgerError> {
        tracing::info!(%date, "deleting expenses for date");
        let _guard = self.lock();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.expense_date != date);
        let removed = before - records.len();
        self.save(&records)?;
        Ok(removed)
    }

    fn delete_by_id(&self, id: i64) -> Result<bool, LedgerError> {
        tracing::info!(id, "deleting expense by id");
        let _guard = self.lock();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }

    fn update(
        &self,
        id: i64,
        patch: &ExpensePatch,
    ) -> Result<Option<ExpenseRecord>, LedgerError> {
        tracing::info!(id, "updating expense");
        let _guard = self.lock();
        let mut records = self.load()?;
        let Some(slot) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let updated = patch.apply(slot)?;
        *slot = updated.clone();
        self.save(&records)?;
        Ok(Some(updated))
    }

    fn replace_day(
        &self,
        date: NaiveDate,
        expenses: Vec<NewExpense>,
    ) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let expenses = expenses
            .into_iter()
            .map(|e| NewExpense { expense_date: date, ..e }.validated())
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(%date, count = expenses.len(), "replacing expenses for date");
        let _guard = self.lock();
        let mut records = self.load()?;
        // Ids come from the full ledger so removed ids are not reused.
        let mut id = next_id(&records);
        records.retain(|r| r.expense_date != date);
        let mut inserted = Vec::with_capacity(expenses.len());
        for expense in expenses {
            let record = ExpenseRecord::from_new(id, expense);
            id += 1;
            records.push(record.clone());
            inserted.push(record);
        }
        self.save(&records)?;
        Ok(inserted)
    }
}

fn duplicate_id(records: &[ExpenseRecord]) -> Option<i64> {
    let mut seen = HashSet::with_capacity(records.len());
    records.iter().map(|r| r.id).find(|id| !seen.insert(*id))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
