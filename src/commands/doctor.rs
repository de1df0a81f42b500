// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::balance_drift;
use crate::models::{Account, AccountGroup, Trade};
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::{BTreeSet, HashMap};

/// Findings as (issue, detail) pairs. Nothing is repaired.
pub fn diagnose(store: &dyn TableStore) -> Result<Vec<(String, String)>> {
    let accounts = Table::<Account>::load(store)?.into_rows();
    let trades = Table::<Trade>::load(store)?.into_rows();
    let groups = Table::<AccountGroup>::load(store)?.into_rows();
    let known: BTreeSet<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
    let mut rows = Vec::new();

    // 1) Trades logged under an account name that does not exist
    let mut orphans: BTreeSet<&str> = BTreeSet::new();
    for t in &trades {
        if !known.contains(t.account.as_str()) {
            orphans.insert(t.account.as_str());
        }
    }
    for name in orphans {
        let n = trades.iter().filter(|t| t.account == name).count();
        rows.push((
            "trade_account_unknown".to_string(),
            format!("'{}' ({} trade(s))", name, n),
        ));
    }

    // 2) Account names used more than once
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for a in &accounts {
        *counts.entry(a.name.as_str()).or_insert(0) += 1;
    }
    let mut dupes: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    dupes.sort();
    for (name, n) in dupes {
        rows.push((
            "account_name_duplicate".to_string(),
            format!("'{}' x{}", name, n),
        ));
    }

    // 3) Group members with no account
    for g in &groups {
        for m in &g.accounts {
            if !known.contains(m.as_str()) {
                rows.push((
                    "group_member_unknown".to_string(),
                    format!("{}: '{}'", g.name, m),
                ));
            }
        }
    }

    // 4) Balance gain and journal PnL disagree
    for a in &accounts {
        let drift = balance_drift(a, &trades);
        if !drift.is_zero() {
            rows.push((
                "balance_journal_drift".to_string(),
                format!("'{}' differs by {:.2}", a.name, drift),
            ));
        }
    }

    Ok(rows)
}

pub fn handle(store: &dyn TableStore) -> Result<()> {
    let rows = diagnose(store)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = rows.into_iter().map(|(i, d)| vec![i, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
