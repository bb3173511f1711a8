// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One stored expense. Field order matches the on-disk document; `amount`
/// is written as a JSON number carrying every digit of the decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub expense_date: NaiveDate,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub notes: String,
}

impl ExpenseRecord {
    pub fn from_new(id: i64, new: NewExpense) -> Self {
        Self {
            id,
            expense_date: new.expense_date,
            amount: new.amount,
            category: new.category,
            notes: new.notes,
        }
    }

    /// The record's fields minus its id.
    pub fn to_new(&self) -> NewExpense {
        NewExpense {
            expense_date: self.expense_date,
            amount: self.amount,
            category: self.category.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Insert payload; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub expense_date: NaiveDate,
    pub amount: Decimal,
    pub category: String,
    pub notes: String,
}

impl NewExpense {
    pub fn new(
        expense_date: NaiveDate,
        amount: Decimal,
        category: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            expense_date,
            amount,
            category: category.into(),
            notes: notes.into(),
        }
    }

    /// Checks the amount and category and returns the trimmed payload.
    pub fn validated(self) -> Result<Self, LedgerError> {
        if self.amount < Decimal::ZERO {
            return Err(LedgerError::validation(format!(
                "amount {} is negative",
                self.amount
            )));
        }
        let category = self.category.trim().to_string();
        if category.is_empty() {
            return Err(LedgerError::validation("category is blank"));
        }
        let notes = self.notes.trim().to_string();
        Ok(Self {
            category,
            notes,
            ..self
        })
    }
}

/// Partial update for an existing record. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub expense_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.expense_date.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.notes.is_none()
    }

    /// Applies the patch on top of `record`, keeping its id.
    pub fn apply(&self, record: &ExpenseRecord) -> Result<ExpenseRecord, LedgerError> {
        let mut merged = record.to_new();
        if let Some(d) = self.expense_date {
            merged.expense_date = d;
        }
        if let Some(a) = self.amount {
            merged.amount = a;
        }
        if let Some(c) = &self.category {
            merged.category = c.clone();
        }
        if let Some(n) = &self.notes {
            merged.notes = n.clone();
        }
        Ok(ExpenseRecord::from_new(record.id, merged.validated()?))
    }
}

/// Sum of one category over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    /// Share of the range's grand total, 0-100.
    pub percentage: Decimal,
}

/// Sum of one calendar month within a year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: u32,
    pub name: String,
    pub total: Decimal,
}
