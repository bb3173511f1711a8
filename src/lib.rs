// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod summary;
pub mod utils;
pub mod commands;

pub use error::LedgerError;
pub use models::{CategoryTotal, ExpensePatch, ExpenseRecord, MonthTotal, NewExpense};
pub use store::{LedgerStore, ReadPolicy, json::JsonLedgerStore, sqlite::SqliteLedgerStore};
