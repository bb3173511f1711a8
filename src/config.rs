// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::store::{LedgerStore, ReadPolicy, json::JsonLedgerStore, sqlite::SqliteLedgerStore};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Expensebook", "expensebook"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Json,
    Sqlite,
}

impl Backend {
    /// Guesses the backend from a file extension; anything unknown is JSON.
    pub fn infer(path: &Path) -> Backend {
        match path.extension().and_then(|e| e.to_str()) {
            Some("sqlite" | "sqlite3" | "db") => Backend::Sqlite,
            _ => Backend::Json,
        }
    }

    fn default_file_name(self) -> &'static str {
        match self {
            Backend::Json => "expenses.json",
            Backend::Sqlite => "expenses.sqlite",
        }
    }
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Backend::Json),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(anyhow!("Unknown backend '{}' (use json|sqlite)", other)),
        }
    }
}

/// Where the ledger lives and how reads fail. Resolved from command-line
/// flags, then `EXPENSEBOOK_*` environment variables, then platform defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub backend: Backend,
    pub read_policy: ReadPolicy,
}

impl Settings {
    pub fn from_matches(m: &clap::ArgMatches) -> Result<Self> {
        let file = m.get_one::<String>("file").map(PathBuf::from);
        let backend = match m.get_one::<String>("backend") {
            Some(b) => b.parse()?,
            None => file.as_deref().map_or(Backend::Json, Backend::infer),
        };
        let data_file = match file {
            Some(f) => f,
            None => default_data_dir()?.join(backend.default_file_name()),
        };
        let read_policy = if m.get_flag("lenient-reads") {
            ReadPolicy::Degrade
        } else {
            ReadPolicy::Propagate
        };
        Ok(Self {
            data_file,
            backend,
            read_policy,
        })
    }

    pub fn open_store(&self) -> Result<Box<dyn LedgerStore>> {
        tracing::debug!(path = %self.data_file.display(), backend = ?self.backend, "opening ledger");
        match self.backend {
            Backend::Json => Ok(Box::new(JsonLedgerStore::with_read_policy(
                &self.data_file,
                self.read_policy,
            ))),
            Backend::Sqlite => {
                if let Some(parent) = self.data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).context("Failed to create data dir")?;
                }
                let store = SqliteLedgerStore::open(&self.data_file, self.read_policy)
                    .with_context(|| format!("Open DB at {}", self.data_file.display()))?;
                Ok(Box::new(store))
            }
        }
    }

    /// Creates an empty ledger at `data_file` if none exists.
    pub fn init_store(&self) -> Result<()> {
        match self.backend {
            Backend::Json => JsonLedgerStore::with_read_policy(&self.data_file, self.read_policy)
                .init()
                .with_context(|| format!("Initialize {}", self.data_file.display())),
            Backend::Sqlite => self.open_store().map(|_| ()),
        }
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}
