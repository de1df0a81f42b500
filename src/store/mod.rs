// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Named-table storage.
//!
//! Every table is a list of uniformly shaped rows with a fixed column order.
//! `save` always replaces the whole table; there is no append log and no
//! locking, so concurrent writers resolve as last write wins.

mod csv_store;
mod sqlite_store;

pub use csv_store::CsvStore;
pub use sqlite_store::SqliteStore;

use crate::error::StoreResult;

pub type Row = Vec<String>;

pub trait TableStore {
    /// Rows of `table` without the header. A table that was never saved is empty.
    fn load(&self, table: &str) -> StoreResult<Vec<Row>>;

    /// Replace `table` with `rows`.
    fn save(&self, table: &str, columns: &[&str], rows: &[Row]) -> StoreResult<()>;
}
