// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::{LedgerStore, ReadPolicy};
use crate::error::LedgerError;
use crate::models::{ExpensePatch, ExpenseRecord, NewExpense};

const SELECT_COLUMNS: &str = "SELECT id, expense_date, amount, category, notes FROM expenses";

/// Relational ledger backend. AUTOINCREMENT keeps ids from being reused
/// after deletes, matching the document store's id rule.
pub struct SqliteLedgerStore {
    conn: Connection,
    read_policy: ReadPolicy,
}

impl SqliteLedgerStore {
    pub fn open(path: &Path, read_policy: ReadPolicy) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, read_policy)
    }

    pub fn open_in_memory() -> Result<Self, LedgerError> {
        Self::from_connection(Connection::open_in_memory()?, ReadPolicy::default())
    }

    pub fn from_connection(conn: Connection, read_policy: ReadPolicy) -> Result<Self, LedgerError> {
        init_schema(&conn)?;
        Ok(Self { conn, read_policy })
    }

    fn select(
        &self,
        clause: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} {} ORDER BY id", SELECT_COLUMNS, clause))?;
        let rows = stmt.query_map(args, record_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn insert_row(conn: &Connection, e: &NewExpense) -> Result<ExpenseRecord, LedgerError> {
        conn.execute(
            "INSERT INTO expenses(expense_date, amount, category, notes) VALUES (?1, ?2, ?3, ?4)",
            params![e.expense_date, e.amount.to_string(), e.category, e.notes],
        )?;
        Ok(ExpenseRecord::from_new(conn.last_insert_rowid(), e.clone()))
    }
}

fn init_schema(conn: &Connection) -> Result<(), LedgerError> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS expenses(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        expense_date TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(expense_date);
    "#,
    )?;
    Ok(())
}

fn record_from_row(r: &Row<'_>) -> rusqlite::Result<ExpenseRecord> {
    let amount: String = r.get(2)?;
    let amount = amount
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(ExpenseRecord {
        id: r.get(0)?,
        expense_date: r.get(1)?,
        amount,
        category: r.get(3)?,
        notes: r.get(4)?,
    })
}

impl LedgerStore for SqliteLedgerStore {
    fn get_all(&self) -> Result<Vec<ExpenseRecord>, LedgerError> {
        tracing::info!("fetching all expenses");
        self.read_policy.recover("get_all", self.select("", &[]))
    }

    fn get_by_date(&self, date: NaiveDate) -> Result<Vec<ExpenseRecord>, LedgerError> {
        tracing::info!(%date, "fetching expenses for date");
        self.read_policy
            .recover("get_by_date", self.select("WHERE expense_date=?1", &[&date]))
    }

    fn get_by_id(&self, id: i64) -> Result<Option<ExpenseRecord>, LedgerError> {
        tracing::info!(id, "fetching expense by id");
        let found = self
            .conn
            .query_row(
                &format!("{} WHERE id=?1", SELECT_COLUMNS),
                params![id],
                record_from_row,
            )
            .optional()
            .map_err(LedgerError::from);
        self.read_policy.recover("get_by_id", found)
    }

    fn insert(&self, expense: NewExpense) -> Result<ExpenseRecord, LedgerError> {
        let expense = expense.validated()?;
        tracing::info!(date = %expense.expense_date, amount = %expense.amount, category = %expense.category, "inserting expense");
        Self::insert_row(&self.conn, &expense).inspect_err(|err| {
            tracing::error!(error = %err, "failed to insert expense");
        })
    }

    fn insert_many(&self, expenses: Vec<NewExpense>) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let expenses = expenses
            .into_iter()
            .map(NewExpense::validated)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(count = expenses.len(), "inserting expenses");
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = Vec::with_capacity(expenses.len());
        for expense in &expenses {
            inserted.push(Self::insert_row(&tx, expense).inspect_err(|err| {
                tracing::error!(error = %err, "failed to insert expense");
            })?);
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn delete_by_date(&self, date: NaiveDate) -> Result<usize, LedgerError> {
        tracing::info!(%date, "deleting expenses for date");
        self.conn
            .execute("DELETE FROM expenses WHERE expense_date=?1", params![date])
            .map_err(LedgerError::from)
            .inspect_err(|err| {
                tracing::error!(%date, error = %err, "failed to delete expenses");
            })
    }

    fn delete_by_id(&self, id: i64) -> Result<bool, LedgerError> {
        tracing::info!(id, "deleting expense by id");
        let n = self
            .conn
            .execute("DELETE FROM expenses WHERE id=?1", params![id])
            .map_err(LedgerError::from)
            .inspect_err(|err| {
                tracing::error!(id, error = %err, "failed to delete expense");
            })?;
        Ok(n > 0)
    }

    fn update(
        &self,
        id: i64,
        patch: &ExpensePatch,
    ) -> Result<Option<ExpenseRecord>, LedgerError> {
        tracing::info!(id, "updating expense");
        let tx = self.conn.unchecked_transaction()?;
        let current = tx
            .query_row(
                &format!("{} WHERE id=?1", SELECT_COLUMNS),
                params![id],
                record_from_row,
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };
        let updated = patch.apply(&current)?;
        tx.execute(
            "UPDATE expenses SET expense_date=?1, amount=?2, category=?3, notes=?4 WHERE id=?5",
            params![
                updated.expense_date,
                updated.amount.to_string(),
                updated.category,
                updated.notes,
                id
            ],
        )?;
        tx.commit()?;
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
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM expenses WHERE expense_date=?1", params![date])?;
        let mut inserted = Vec::with_capacity(expenses.len());
        for expense in &expenses {
            inserted.push(Self::insert_row(&tx, expense)?);
        }
        tx.commit()?;
        Ok(inserted)
    }
}
