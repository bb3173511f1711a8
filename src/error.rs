// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by ledger stores.
///
/// A lookup that finds nothing is never an error; stores return `None` or an
/// empty `Vec` instead.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger document {} is unavailable: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger document {} is corrupt: {reason}", .path.display())]
    StorageCorrupt { path: PathBuf, reason: String },
    #[error("invalid expense: {0}")]
    Validation(String),
    #[error("ledger database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl LedgerError {
    /// True for failures of the backing storage, as opposed to bad input.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            LedgerError::StorageUnavailable { .. }
                | LedgerError::StorageCorrupt { .. }
                | LedgerError::Database(_)
        )
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }
}
