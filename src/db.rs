// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{CsvStore, SqliteStore, TableStore};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tradebook", "tradebook"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Csv,
    Sqlite,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Backend::Csv),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(anyhow!("Unknown backend '{}' (use csv|sqlite)", other)),
        }
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}

/// `explicit` wins over the platform data dir.
pub fn data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(p) => p.to_path_buf(),
        None => default_data_dir()?,
    };
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

pub fn sqlite_path(dir: &Path) -> PathBuf {
    dir.join("tradebook.sqlite")
}

pub fn open_store(backend: Backend, dir: &Path) -> Result<Box<dyn TableStore>> {
    let store: Box<dyn TableStore> = match backend {
        Backend::Csv => Box::new(
            CsvStore::new(dir).with_context(|| format!("Open CSV tables in {}", dir.display()))?,
        ),
        Backend::Sqlite => {
            let path = sqlite_path(dir);
            Box::new(
                SqliteStore::open(&path)
                    .with_context(|| format!("Open DB at {}", path.display()))?,
            )
        }
    };
    info!(?backend, dir = %dir.display(), "opened store");
    Ok(store)
}
