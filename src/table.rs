// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed tables over a [`TableStore`].
//!
//! A [`Table`] is loaded whole, edited in memory with `upsert`/`delete`, and
//! written back whole. Row decoding never fails: malformed numbers become
//! zero and malformed dates become the epoch, each with a warning.

use crate::error::StoreResult;
use crate::models::{
    Account, AccountGroup, AccountKind, AccountStatus, FinanceEntry, FinanceKind, Frequency,
    Objective, ObjectiveStatus, Outcome, Subscription, Trade,
};
use crate::store::{Row, TableStore};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, warn};

pub trait Record: Sized {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn to_row(&self) -> Row;
    fn from_row(cells: &Cells<'_>) -> Self;
}

/// Positional view over one stored row.
pub struct Cells<'a> {
    table: &'static str,
    columns: &'static [&'static str],
    row: &'a [String],
}

impl<'a> Cells<'a> {
    pub fn new(table: &'static str, columns: &'static [&'static str], row: &'a [String]) -> Self {
        Self {
            table,
            columns,
            row,
        }
    }

    fn column(&self, i: usize) -> &'static str {
        self.columns.get(i).copied().unwrap_or("?")
    }

    pub fn raw(&self, i: usize) -> &str {
        self.row.get(i).map(|s| s.trim()).unwrap_or("")
    }

    pub fn text(&self, i: usize) -> String {
        self.raw(i).to_string()
    }

    pub fn decimal(&self, i: usize) -> Decimal {
        self.opt_decimal(i).unwrap_or(Decimal::ZERO)
    }

    pub fn opt_decimal(&self, i: usize) -> Option<Decimal> {
        let raw = self.raw(i);
        if raw.is_empty() {
            return None;
        }
        match coerce_decimal(raw) {
            Some(d) => Some(d),
            None => {
                warn!(
                    table = self.table,
                    column = self.column(i),
                    value = raw,
                    "malformed number, using 0"
                );
                Some(Decimal::ZERO)
            }
        }
    }

    pub fn int(&self, i: usize) -> i64 {
        let raw = self.raw(i);
        if raw.is_empty() {
            return 0;
        }
        raw.parse::<i64>()
            .ok()
            .or_else(|| coerce_decimal(raw).and_then(|d| d.trunc().to_i64()))
            .unwrap_or_else(|| {
                warn!(
                    table = self.table,
                    column = self.column(i),
                    value = raw,
                    "malformed integer, using 0"
                );
                0
            })
    }

    pub fn date(&self, i: usize) -> NaiveDate {
        self.opt_date(i).unwrap_or_default()
    }

    pub fn opt_date(&self, i: usize) -> Option<NaiveDate> {
        let raw = self.raw(i);
        if raw.is_empty() {
            return None;
        }
        // Tolerate timestamps written as "YYYY-MM-DD HH:MM:SS".
        let day = raw.get(..10).unwrap_or(raw);
        match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                warn!(
                    table = self.table,
                    column = self.column(i),
                    value = raw,
                    "malformed date, using 1970-01-01"
                );
                Some(NaiveDate::default())
            }
        }
    }

    pub fn parse_or<T: FromStr>(&self, i: usize, fallback: T) -> T {
        let raw = self.raw(i);
        raw.parse::<T>().unwrap_or_else(|_| {
            if !raw.is_empty() {
                warn!(
                    table = self.table,
                    column = self.column(i),
                    value = raw,
                    "unrecognised value, using default"
                );
            }
            fallback
        })
    }
}

/// Parses a money-like cell: surrounding whitespace, a leading currency sign
/// and thousands separators are accepted.
pub fn coerce_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    cleaned
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&cleaned).ok())
}

fn opt_to_cell<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(|x| x.to_string()).unwrap_or_default()
}

/// One past the largest taken id, or the lowest free positive id once that
/// would overflow.
fn fresh_id(taken: &HashSet<i64>) -> i64 {
    let top = taken.iter().copied().max().unwrap_or(0).max(0);
    top.checked_add(1)
        .or_else(|| (1..i64::MAX).find(|id| !taken.contains(id)))
        .unwrap_or(0)
}

pub struct Table<T: Record> {
    rows: Vec<T>,
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Record> Table<T> {
    pub fn load(store: &dyn TableStore) -> StoreResult<Self> {
        let raw = store.load(T::TABLE)?;
        let rows = raw
            .iter()
            .map(|r| T::from_row(&Cells::new(T::TABLE, T::COLUMNS, r)))
            .collect();
        Ok(Self::from_rows(rows))
    }

    /// Rows without a usable id (zero, negative or repeated) get a fresh one.
    pub fn from_rows(mut rows: Vec<T>) -> Self {
        let mut taken: HashSet<i64> = rows.iter().map(|r| r.id()).filter(|id| *id > 0).collect();
        let mut seen = HashSet::new();
        for row in rows.iter_mut() {
            if row.id() <= 0 || !seen.insert(row.id()) {
                let next = fresh_id(&taken);
                debug!(table = T::TABLE, old = row.id(), new = next, "assigning row id");
                row.set_id(next);
                taken.insert(next);
                seen.insert(next);
            }
        }
        Self { rows }
    }

    pub fn list(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.iter_mut().find(|r| r.id() == id)
    }

    pub fn next_id(&self) -> i64 {
        fresh_id(&self.rows.iter().map(|r| r.id()).collect())
    }

    /// Replaces the row with the same id in place, or appends. An id of zero
    /// or below always appends under a new id. Returns the row's id.
    pub fn upsert(&mut self, mut row: T) -> i64 {
        if row.id() > 0 {
            if let Some(slot) = self.rows.iter_mut().find(|r| r.id() == row.id()) {
                let id = row.id();
                *slot = row;
                return id;
            }
        } else {
            row.set_id(self.next_id());
        }
        let id = row.id();
        self.rows.push(row);
        id
    }

    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id() != id);
        self.rows.len() != before
    }

    pub fn save(&self, store: &dyn TableStore) -> StoreResult<()> {
        let rows: Vec<Row> = self.rows.iter().map(|r| r.to_row()).collect();
        store.save(T::TABLE, T::COLUMNS, &rows)
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }
}

impl Record for Trade {
    const TABLE: &'static str = "trades";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "date",
        "account",
        "instrument",
        "strategy",
        "outcome",
        "risk_reward",
        "pnl",
        "emotion",
        "screenshot",
        "notes",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.date.to_string(),
            self.account.clone(),
            self.instrument.clone(),
            self.strategy.clone(),
            self.outcome.to_string(),
            self.risk_reward.to_string(),
            self.pnl.to_string(),
            self.emotion.clone(),
            self.screenshot.clone(),
            self.notes.clone(),
        ]
    }

    fn from_row(c: &Cells<'_>) -> Self {
        Trade {
            id: c.int(0),
            date: c.date(1),
            account: c.text(2),
            instrument: c.text(3),
            strategy: c.text(4),
            outcome: c.parse_or(5, Outcome::BreakEven),
            risk_reward: c.decimal(6),
            pnl: c.decimal(7),
            emotion: c.text(8),
            screenshot: c.text(9),
            notes: c.text(10),
        }
    }
}

impl Record for Account {
    const TABLE: &'static str = "accounts";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "firm",
        "kind",
        "initial_balance",
        "current_balance",
        "target_balance",
        "target_days",
        "cost",
        "status",
        "created",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.firm.clone(),
            self.kind.as_str().to_string(),
            self.initial_balance.to_string(),
            self.current_balance.to_string(),
            self.target_balance.to_string(),
            self.target_days.to_string(),
            self.cost.to_string(),
            self.status.as_str().to_string(),
            self.created.to_string(),
        ]
    }

    fn from_row(c: &Cells<'_>) -> Self {
        Account {
            id: c.int(0),
            name: c.text(1),
            firm: c.text(2),
            kind: c.parse_or(3, AccountKind::Trial),
            initial_balance: c.decimal(4),
            current_balance: c.decimal(5),
            target_balance: c.decimal(6),
            target_days: u32::try_from(c.int(7)).unwrap_or(0),
            cost: c.decimal(8),
            status: c.parse_or(9, AccountStatus::Active),
            created: c.date(10),
        }
    }
}

impl Record for FinanceEntry {
    const TABLE: &'static str = "finances";
    const COLUMNS: &'static [&'static str] = &["id", "date", "kind", "concept", "amount"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.date.to_string(),
            self.kind.to_string(),
            self.concept.clone(),
            self.amount.to_string(),
        ]
    }

    fn from_row(c: &Cells<'_>) -> Self {
        FinanceEntry {
            id: c.int(0),
            date: c.date(1),
            kind: c.parse_or(2, FinanceKind::OtherExpense),
            concept: c.text(3),
            // Stored signed; never re-derived from the kind on read.
            amount: c.decimal(4),
        }
    }
}

impl Record for Objective {
    const TABLE: &'static str = "objectives";
    const COLUMNS: &'static [&'static str] =
        &["id", "task", "frequency", "due", "status", "target_money"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.task.clone(),
            self.frequency.as_str().to_string(),
            opt_to_cell(&self.due),
            self.status.as_str().to_string(),
            opt_to_cell(&self.target_money),
        ]
    }

    fn from_row(c: &Cells<'_>) -> Self {
        let status = if c.raw(4).eq_ignore_ascii_case("done") {
            ObjectiveStatus::Done
        } else {
            ObjectiveStatus::Pending
        };
        Objective {
            id: c.int(0),
            task: c.text(1),
            frequency: c.parse_or(2, Frequency::Once),
            due: c.opt_date(3),
            status,
            target_money: c.opt_decimal(5),
        }
    }
}

impl Record for Subscription {
    const TABLE: &'static str = "subscriptions";
    const COLUMNS: &'static [&'static str] = &["id", "service", "monthly_amount", "renewal_day"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.service.clone(),
            self.monthly_amount.to_string(),
            self.renewal_day.to_string(),
        ]
    }

    fn from_row(c: &Cells<'_>) -> Self {
        Subscription {
            id: c.int(0),
            service: c.text(1),
            monthly_amount: c.decimal(2),
            renewal_day: c.int(3).clamp(1, 31) as u32,
        }
    }
}

impl Record for AccountGroup {
    const TABLE: &'static str = "groups";
    const COLUMNS: &'static [&'static str] = &["id", "name", "accounts"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.name.clone(),
            serde_json::to_string(&self.accounts).unwrap_or_else(|_| "[]".to_string()),
        ]
    }

    fn from_row(c: &Cells<'_>) -> Self {
        let raw = c.raw(2);
        let accounts = if raw.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| {
                warn!(table = Self::TABLE, value = raw, "group members are not a JSON list");
                Vec::new()
            })
        };
        AccountGroup {
            id: c.int(0),
            name: c.text(1),
            accounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_accepts_money_formatting() {
        assert_eq!(coerce_decimal(" $1,250.50 "), Some(Decimal::new(125050, 2)));
        assert_eq!(coerce_decimal("1_000"), Some(Decimal::from(1000)));
        assert_eq!(coerce_decimal("1.5e3"), Some(Decimal::from(1500)));
        assert_eq!(coerce_decimal("n/a"), None);
    }

    #[test]
    fn cells_fall_back_on_garbage() {
        let row: Vec<String> = ["x", "2024-13-40", "7.9", ""].map(String::from).to_vec();
        let cells = Cells::new("t", &["a", "b", "c", "d"], &row);
        assert_eq!(cells.decimal(0), Decimal::ZERO);
        assert_eq!(cells.date(1), NaiveDate::default());
        assert_eq!(cells.int(2), 7);
        assert_eq!(cells.opt_decimal(3), None);
        assert_eq!(cells.opt_date(3), None);
        assert_eq!(cells.text(9), "");
    }

    #[test]
    fn fresh_id_survives_the_largest_id() {
        let taken: HashSet<i64> = [1, 2, i64::MAX].into_iter().collect();
        assert_eq!(fresh_id(&taken), 3);
        assert_eq!(fresh_id(&HashSet::new()), 1);
        assert_eq!(fresh_id(&[-4, 7].into_iter().collect()), 8);
    }
}
