// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{Row, TableStore};
use crate::error::StoreResult;
use rusqlite::{Connection, params};
use std::cell::RefCell;
use std::path::Path;
use tracing::debug;

/// All tables in one SQLite file; each row's cells are kept as a JSON array.
pub struct SqliteStore {
    conn: RefCell<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: RefCell::new(conn),
        })
    }
}

fn init_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS table_rows(
        tbl TEXT NOT NULL,
        pos INTEGER NOT NULL,
        cells TEXT NOT NULL,
        PRIMARY KEY(tbl, pos)
    );
    "#,
    )?;
    Ok(())
}

impl TableStore for SqliteStore {
    fn load(&self, table: &str) -> StoreResult<Vec<Row>> {
        let conn = self.conn.borrow();
        let mut stmt =
            conn.prepare_cached("SELECT cells FROM table_rows WHERE tbl=?1 ORDER BY pos")?;
        let mut cur = stmt.query(params![table])?;
        let mut rows = Vec::new();
        while let Some(r) = cur.next()? {
            let cells: String = r.get(0)?;
            let row: Row = serde_json::from_str(&cells)?;
            rows.push(row);
        }
        debug!(table, rows = rows.len(), "loaded sqlite table");
        Ok(rows)
    }

    // Cells are positional, so the column names are not stored.
    fn save(&self, table: &str, _columns: &[&str], rows: &[Row]) -> StoreResult<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM table_rows WHERE tbl=?1", params![table])?;
        {
            let mut ins =
                tx.prepare("INSERT INTO table_rows(tbl, pos, cells) VALUES (?1, ?2, ?3)")?;
            for (pos, row) in rows.iter().enumerate() {
                ins.execute(params![table, pos as i64, serde_json::to_string(row)?])?;
            }
        }
        tx.commit()?;
        debug!(table, rows = rows.len(), "saved sqlite table");
        Ok(())
    }
}
