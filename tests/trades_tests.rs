// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::ArgMatches;
use rust_decimal::Decimal;
use tradebook::models::{Outcome, Trade};
use tradebook::store::SqliteStore;
use tradebook::table::Table;
use tradebook::{cli, commands::trades};

/// Matches of the innermost subcommand.
fn leaf(args: &[&str]) -> ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args.iter().copied());
    loop {
        let next = match m.subcommand() {
            Some((_, sub)) => sub.clone(),
            None => return m,
        };
        m = next;
    }
}

fn add_trade(store: &SqliteStore, date: &str, account: &str, pnl: &str, outcome: &str) -> Trade {
    let m = leaf(&[
        "tradebook",
        "trade",
        "add",
        "--date",
        date,
        "--account",
        account,
        "--instrument",
        "NQ",
        "--strategy",
        "range",
        "--outcome",
        outcome,
        "--pnl",
        pnl,
    ]);
    trades::add(store, &m).unwrap()
}

#[test]
fn add_parses_signed_pnl_and_short_outcomes() {
    let store = SqliteStore::open_in_memory().unwrap();
    let t = add_trade(&store, "2024-06-03", "Apex 1", "-45.50", "l");
    assert_eq!(t.id, 1);
    assert_eq!(t.outcome, Outcome::Loss);
    assert_eq!(t.pnl, "-45.50".parse::<Decimal>().unwrap());
    assert_eq!(t.risk_reward, Decimal::ZERO);

    let stored = Table::<Trade>::load(&store).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.get(1).unwrap().account, "Apex 1");
}

#[test]
fn add_rejects_bad_input_without_writing() {
    let store = SqliteStore::open_in_memory().unwrap();
    let m = leaf(&[
        "tradebook",
        "trade",
        "add",
        "--account",
        "A1",
        "--instrument",
        "ES",
        "--outcome",
        "maybe",
        "--pnl",
        "10",
    ]);
    assert!(trades::add(&store, &m).is_err());

    let m = leaf(&[
        "tradebook",
        "trade",
        "add",
        "--date",
        "03/06/2024",
        "--account",
        "A1",
        "--instrument",
        "ES",
        "--outcome",
        "win",
        "--pnl",
        "10",
    ]);
    assert!(trades::add(&store, &m).is_err());
    assert!(Table::<Trade>::load(&store).unwrap().is_empty());
}

#[test]
fn list_keeps_most_recent_rows_and_filters() {
    let store = SqliteStore::open_in_memory().unwrap();
    for i in 1..=12 {
        let account = if i % 2 == 0 { "even" } else { "odd" };
        add_trade(&store, "2024-06-03", account, &i.to_string(), "win");
    }

    let rows = trades::query_rows(&store, &leaf(&["tradebook", "trade", "list"])).unwrap();
    let ids: Vec<i64> = rows.iter().map(|t| t.id).collect();
    assert_eq!(ids, (3..=12).collect::<Vec<_>>());

    let all = leaf(&["tradebook", "trade", "list", "--limit", "0"]);
    assert_eq!(trades::query_rows(&store, &all).unwrap().len(), 12);

    let odd = leaf(&["tradebook", "trade", "list", "--account", "odd", "--limit", "2"]);
    let ids: Vec<i64> = trades::query_rows(&store, &odd)
        .unwrap()
        .iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec![9, 11]);
}

#[test]
fn edit_changes_only_given_fields() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_trade(&store, "2024-06-03", "A1", "100", "win");
    let m = leaf(&[
        "tradebook", "trade", "edit", "--id", "1", "--pnl", "-20", "--outcome", "loss", "--notes",
        "moved stop",
    ]);
    let t = trades::edit(&store, &m).unwrap();
    assert_eq!(t.pnl, Decimal::from(-20));
    assert_eq!(t.outcome, Outcome::Loss);
    assert_eq!(t.notes, "moved stop");
    assert_eq!(t.account, "A1");
    assert_eq!(t.strategy, "range");

    let missing = leaf(&["tradebook", "trade", "edit", "--id", "9", "--pnl", "1"]);
    assert!(trades::edit(&store, &missing).is_err());
}

#[test]
fn rm_deletes_by_id() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_trade(&store, "2024-06-03", "A1", "100", "win");
    add_trade(&store, "2024-06-04", "A1", "50", "win");

    let m = cli::build_cli().get_matches_from(["tradebook", "trade", "rm", "--id", "1"]);
    let (_, trade_m) = m.subcommand().unwrap();
    trades::handle(&store, trade_m).unwrap();

    let left = Table::<Trade>::load(&store).unwrap();
    assert_eq!(left.len(), 1);
    assert!(left.get(2).is_some());
    assert!(trades::handle(&store, trade_m).is_err());
}
