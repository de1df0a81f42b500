// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use tradebook::models::{AccountGroup, FinanceEntry, FinanceKind, Outcome, Subscription, Trade};
use tradebook::store::{CsvStore, SqliteStore, TableStore};
use tradebook::table::{Record, Table};

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

fn roundtrip_and_overwrite(store: &dyn TableStore) {
    assert!(store.load("trades").unwrap().is_empty());

    let cols = ["id", "name"];
    store
        .save("things", &cols, &[row(&["1", "a, with comma"]), row(&["2", "b"])])
        .unwrap();
    let loaded = store.load("things").unwrap();
    assert_eq!(loaded, vec![row(&["1", "a, with comma"]), row(&["2", "b"])]);

    // Saving replaces the whole table.
    store.save("things", &cols, &[row(&["3", "c"])]).unwrap();
    assert_eq!(store.load("things").unwrap(), vec![row(&["3", "c"])]);

    store.save("things", &cols, &[]).unwrap();
    assert!(store.load("things").unwrap().is_empty());
    assert!(store.load("other").unwrap().is_empty());
}

#[test]
fn csv_store_roundtrip_and_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path().join("data")).unwrap();
    roundtrip_and_overwrite(&store);
    assert!(store.dir().join("things.csv").exists());
    assert!(!store.dir().join(".things.csv.tmp").exists());
}

#[test]
fn sqlite_store_roundtrip_and_overwrite() {
    let store = SqliteStore::open_in_memory().unwrap();
    roundtrip_and_overwrite(&store);
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.sqlite");
    {
        let store = SqliteStore::open(&path).unwrap();
        store.save("t", &["id"], &[row(&["7"])]).unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.load("t").unwrap(), vec![row(&["7"])]);
    drop(store);

    let conn = rusqlite::Connection::open(&path).unwrap();
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
        .unwrap();
    let tables: Vec<String> = stmt
        .query_map([], |r| r.get(0))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(tables, vec!["table_rows"]);
}

#[test]
fn malformed_cells_are_coerced_not_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .save(
            Trade::TABLE,
            Trade::COLUMNS,
            &[
                row(&["1", "2024-01-05", "A1", "NQ", "range", "win", "2", "abc", "", "", ""]),
                row(&["2", "not a date", "A1", "ES", "range", "??", "x", "$1,250.50"]),
            ],
        )
        .unwrap();

    let trades = Table::<Trade>::load(&store).unwrap().into_rows();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].pnl, Decimal::ZERO);
    assert_eq!(trades[0].outcome, Outcome::Win);
    assert_eq!(trades[1].date, chrono::NaiveDate::default());
    assert_eq!(trades[1].outcome, Outcome::BreakEven);
    assert_eq!(trades[1].risk_reward, Decimal::ZERO);
    assert_eq!(trades[1].pnl, "1250.50".parse::<Decimal>().unwrap());
    assert_eq!(trades[1].notes, "");
}

#[test]
fn table_upsert_delete_and_ids() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut subs = Table::<Subscription>::load(&store).unwrap();
    assert!(subs.is_empty());

    let tv = Subscription {
        id: 0,
        service: "TradingView".into(),
        monthly_amount: Decimal::from(30),
        renewal_day: 12,
    };
    let first = subs.upsert(tv.clone());
    let second = subs.upsert(Subscription {
        service: "Data feed".into(),
        ..tv.clone()
    });
    assert_eq!((first, second), (1, 2));

    // Same id replaces in place.
    subs.upsert(Subscription {
        id: 1,
        monthly_amount: Decimal::from(60),
        ..tv.clone()
    });
    assert_eq!(subs.len(), 2);
    assert_eq!(subs.get(1).unwrap().monthly_amount, Decimal::from(60));

    assert!(subs.delete(2));
    assert!(!subs.delete(2));
    subs.save(&store).unwrap();

    let again = Table::<Subscription>::load(&store).unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(again.next_id(), 2);
}

#[test]
fn duplicate_and_missing_ids_are_reassigned() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .save(
            FinanceEntry::TABLE,
            FinanceEntry::COLUMNS,
            &[
                row(&["4", "2024-01-01", "payout", "first", "1000"]),
                row(&["4", "2024-01-02", "software", "dup", "-30"]),
                row(&["", "2024-01-03", "education", "blank", "-200"]),
            ],
        )
        .unwrap();
    let entries = Table::<FinanceEntry>::load(&store).unwrap();
    let ids: Vec<i64> = entries.list().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![4, 5, 6]);
    assert_eq!(entries.get(5).unwrap().kind, FinanceKind::Software);
    assert_eq!(entries.get(6).unwrap().amount, Decimal::from(-200));
}

#[test]
fn largest_possible_id_does_not_break_loading() {
    let store = SqliteStore::open_in_memory().unwrap();
    let max = i64::MAX.to_string();
    store
        .save(
            FinanceEntry::TABLE,
            FinanceEntry::COLUMNS,
            &[
                row(&[&max, "2024-01-01", "payout", "first", "1000"]),
                row(&[&max, "2024-01-02", "software", "dup", "-30"]),
                row(&["", "2024-01-03", "education", "blank", "-200"]),
            ],
        )
        .unwrap();
    let mut entries = Table::<FinanceEntry>::load(&store).unwrap();
    let ids: Vec<i64> = entries.list().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![i64::MAX, 1, 2]);
    assert_eq!(entries.next_id(), 3);

    let mut extra = entries.get(1).unwrap().clone();
    extra.id = 0;
    assert_eq!(entries.upsert(extra), 3);
}

#[test]
fn group_members_survive_commas_in_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(dir.path()).unwrap();
    let mut groups = Table::<AccountGroup>::default();
    groups.upsert(AccountGroup {
        id: 0,
        name: "Apex".into(),
        accounts: vec!["Apex 50k, #1".into(), "Apex 50k, #2".into()],
    });
    groups.save(&store).unwrap();

    let loaded = Table::<AccountGroup>::load(&store).unwrap().into_rows();
    assert_eq!(loaded[0].accounts, vec!["Apex 50k, #1", "Apex 50k, #2"]);
}
