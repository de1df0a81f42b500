// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Row, TableStore};
use crate::error::StoreResult;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One `<table>.csv` file per table, header row first.
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table))
    }
}

impl TableStore for CsvStore {
    fn load(&self, table: &str) -> StoreResult<Vec<Row>> {
        let path = self.path_for(table);
        if !path.exists() {
            debug!(table, path = %path.display(), "table file absent, treating as empty");
            return Ok(Vec::new());
        }
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)?;
        let mut rows = Vec::new();
        for result in rdr.records() {
            let rec = result?;
            rows.push(rec.iter().map(|s| s.to_string()).collect());
        }
        debug!(table, rows = rows.len(), "loaded csv table");
        Ok(rows)
    }

    fn save(&self, table: &str, columns: &[&str], rows: &[Row]) -> StoreResult<()> {
        let path = self.path_for(table);
        let tmp = self.dir.join(format!(".{}.csv.tmp", table));
        {
            let mut wtr = WriterBuilder::new().from_path(&tmp)?;
            wtr.write_record(columns)?;
            for row in rows {
                wtr.write_record(row)?;
            }
            wtr.flush()?;
        }
        fs::rename(&tmp, &path)?;
        debug!(table, rows = rows.len(), "saved csv table");
        Ok(())
    }
}
