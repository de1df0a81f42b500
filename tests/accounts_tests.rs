// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use clap::ArgMatches;
use rust_decimal::Decimal;
use tradebook::cli;
use tradebook::commands::{accounts, doctor, finances, groups, objectives, reports, trades};
use tradebook::models::{
    AccountKind, AccountStatus, FinanceEntry, FinanceKind, Objective, ObjectiveStatus,
};
use tradebook::store::SqliteStore;
use tradebook::table::Table;

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

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn add_account(store: &SqliteStore, name: &str, initial: &str, target: &str) {
    let m = leaf(&[
        "tradebook", "account", "add", "--name", name, "--firm", "Apex", "--initial", initial,
        "--target", target, "--cost", "147", "--created", "2024-01-01",
    ]);
    accounts::add(store, &m).unwrap();
}

fn add_trade(store: &SqliteStore, account: &str, pnl: &str) {
    let m = leaf(&[
        "tradebook", "trade", "add", "--date", "2024-01-03", "--account", account,
        "--instrument", "NQ", "--outcome", "win", "--pnl", pnl,
    ]);
    trades::add(store, &m).unwrap();
}

#[test]
fn account_add_defaults_current_to_initial() {
    let store = SqliteStore::open_in_memory().unwrap();
    let m = leaf(&[
        "tradebook", "account", "add", "--name", "Apex 50k", "--type", "funded", "--initial",
        "50000", "--target", "53000",
    ]);
    let a = accounts::add(&store, &m).unwrap();
    assert_eq!(a.id, 1);
    assert_eq!(a.kind, AccountKind::Funded);
    assert_eq!(a.current_balance, d("50000"));
    assert_eq!(a.status, AccountStatus::Active);
    assert_eq!(a.target_days, 0);

    let bad = leaf(&[
        "tradebook", "account", "add", "--name", "X", "--type", "demo", "--initial", "1",
        "--target", "2",
    ]);
    assert!(accounts::add(&store, &bad).is_err());
}

#[test]
fn balance_is_edited_by_hand_and_trades_do_not_move_it() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_account(&store, "A1", "50000", "53000");
    add_trade(&store, "A1", "250");

    let m = leaf(&["tradebook", "account", "set", "--id", "1", "--balance", "51500"]);
    let a = accounts::set(&store, &m).unwrap();
    assert_eq!(a.current_balance, d("51500"));
    assert_eq!(a.firm, "Apex");

    let progress = accounts::progress_rows(&store, &leaf(&["tradebook", "account", "progress"]))
        .unwrap();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].ratio, d("0.5"));
    assert_eq!(progress[0].balance_gain, d("1500"));
    assert_eq!(progress[0].journal_pnl, d("250"));
}

#[test]
fn progress_hides_historic_accounts_unless_asked() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_account(&store, "Old", "25000", "26500");
    add_account(&store, "New", "50000", "53000");
    let m = leaf(&["tradebook", "account", "set", "--id", "1", "--status", "historic"]);
    accounts::set(&store, &m).unwrap();

    let active = leaf(&["tradebook", "account", "progress"]);
    assert_eq!(accounts::progress_rows(&store, &active).unwrap().len(), 1);
    let all = leaf(&["tradebook", "account", "progress", "--all"]);
    assert_eq!(accounts::progress_rows(&store, &all).unwrap().len(), 2);
    let named = leaf(&["tradebook", "account", "progress", "--name", "Old"]);
    assert_eq!(accounts::progress_rows(&store, &named).unwrap()[0].name, "Old");
}

#[test]
fn finance_sign_follows_kind() {
    let store = SqliteStore::open_in_memory().unwrap();
    let cases = [
        ("prop-firm", "150", "-150"),
        ("software", "30", "-30"),
        ("payout", "1000", "1000"),
        ("payout", "400", "400"),
    ];
    for (kind, amount, expected) in cases {
        let m = leaf(&[
            "tradebook", "finance", "add", "--date", "2024-02-01", "--kind", kind, "--amount",
            amount,
        ]);
        let e = finances::add(&store, &m).unwrap();
        assert_eq!(e.amount, d(expected), "{kind} {amount}");
    }
    let entries = Table::<FinanceEntry>::load(&store).unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries.get(3).unwrap().kind, FinanceKind::Payout);

    let bad = leaf(&["tradebook", "finance", "add", "--kind", "gift", "--amount", "1"]);
    assert!(finances::add(&store, &bad).is_err());

    let negative = leaf(&["tradebook", "finance", "add", "--kind", "payout", "--amount", "-50"]);
    assert!(finances::add(&store, &negative).is_err());
    assert_eq!(Table::<FinanceEntry>::load(&store).unwrap().len(), 4);
}

#[test]
fn dashboard_combines_journal_and_finances() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_trade(&store, "A1", "200");
    add_trade(&store, "A2", "-50");
    for (kind, amount) in [("prop-firm", "100"), ("payout", "2500")] {
        let m = leaf(&["tradebook", "finance", "add", "--kind", kind, "--amount", amount]);
        finances::add(&store, &m).unwrap();
    }

    let s = reports::dashboard_summary(&store, &leaf(&["tradebook", "dashboard"])).unwrap();
    assert_eq!(s.gross_pnl, d("150"));
    assert_eq!(s.cash_balance, d("2400"));
    assert_eq!(s.net, d("2550"));
    assert_eq!(s.payout_goal_progress, d("0.25"));
    assert_eq!(s.winning_days, 1);

    let only_a1 = leaf(&["tradebook", "dashboard", "--account", "A1"]);
    let s = reports::dashboard_summary(&store, &only_a1).unwrap();
    assert_eq!(s.trades, 1);
    assert_eq!(s.win_rate, Decimal::ONE_HUNDRED);
    assert_eq!(s.gross_pnl, d("200"));
    assert_eq!(s.cash_balance, Decimal::ZERO);
    assert_eq!(s.net, d("200"));
    assert_eq!(s.payouts, Decimal::ZERO);

    let days = reports::day_rows(&store, &leaf(&["tradebook", "days"])).unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].pnl, d("150"));
    assert!(days[0].winning);

    let curve = reports::curve_points(&store, &leaf(&["tradebook", "curve"])).unwrap();
    assert_eq!(curve.last().unwrap().equity, d("150"));
}

#[test]
fn groups_dedupe_members_and_report_unknown_ones() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_account(&store, "A1", "50000", "53000");
    add_trade(&store, "A1", "300");
    let m = leaf(&[
        "tradebook", "group", "add", "--name", "Apex", "--account", "A1", "--account", "Ghost",
        "--account", "A1",
    ]);
    let g = groups::add(&store, &m).unwrap();
    assert_eq!(g.accounts, vec!["A1", "Ghost"]);

    let summaries = groups::summaries(&store).unwrap();
    assert_eq!(summaries[0].journal_pnl, d("300"));
    assert_eq!(summaries[0].missing, vec!["Ghost"]);

    let empty = leaf(&["tradebook", "group", "add", "--name", "None", "--account", " "]);
    assert!(groups::add(&store, &empty).is_err());
}

#[test]
fn objectives_are_marked_done() {
    let store = SqliteStore::open_in_memory().unwrap();
    let m = leaf(&[
        "tradebook", "objective", "add", "--task", "Pass eval", "--frequency", "monthly",
        "--due", "2024-03-31", "--target-money", "3000",
    ]);
    let o = objectives::add(&store, &m).unwrap();
    assert_eq!(o.status, ObjectiveStatus::Pending);
    assert_eq!(o.due, NaiveDate::from_ymd_opt(2024, 3, 31));
    assert_eq!(o.target_money, Some(d("3000")));

    objectives::mark_done(&store, o.id).unwrap();
    let stored = Table::<Objective>::load(&store).unwrap();
    assert_eq!(stored.get(o.id).unwrap().status, ObjectiveStatus::Done);
    assert!(objectives::mark_done(&store, 42).is_err());
}

#[test]
fn doctor_reports_without_repairing() {
    let store = SqliteStore::open_in_memory().unwrap();
    add_account(&store, "A1", "50000", "53000");
    add_account(&store, "A1", "25000", "26500");
    add_trade(&store, "Ghost", "10");
    let m = leaf(&["tradebook", "group", "add", "--name", "G", "--account", "Missing"]);
    groups::add(&store, &m).unwrap();

    let issues = doctor::diagnose(&store).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|(k, _)| k.as_str()).collect();
    assert!(kinds.contains(&"trade_account_unknown"));
    assert!(kinds.contains(&"account_name_duplicate"));
    assert!(kinds.contains(&"group_member_unknown"));
    assert!(!kinds.contains(&"balance_journal_drift"));

    // Balance moved by hand without matching journal entries.
    let m = leaf(&["tradebook", "account", "set", "--id", "2", "--balance", "25400"]);
    accounts::set(&store, &m).unwrap();
    let issues = doctor::diagnose(&store).unwrap();
    assert!(issues.iter().any(|(k, _)| k == "balance_journal_drift"));
    assert_eq!(Table::<FinanceEntry>::load(&store).unwrap().len(), 0);
}
