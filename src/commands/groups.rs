// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::ledger::{GroupSummary, group_summary};
use crate::models::{Account, AccountGroup, Trade};
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, required};
use anyhow::{Result, anyhow};
use tracing::warn;

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let g = add(store, sub)?;
            println!(
                "Added group #{} '{}' with {} account(s)",
                g.id,
                g.name,
                g.accounts.len()
            );
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
            let mut table = Table::<AccountGroup>::load(store)?;
            if !table.delete(id) {
                return Err(anyhow!("Group #{} not found", id));
            }
            table.save(store)?;
            println!("Removed group #{}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Members keep the order given; repeats are dropped.
pub fn add(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<AccountGroup> {
    let name = required(sub, "name")?.to_string();
    let mut members: Vec<String> = Vec::new();
    for raw in sub.get_many::<String>("account").into_iter().flatten() {
        let member = raw.trim();
        if !member.is_empty() && !members.iter().any(|m| m == member) {
            members.push(member.to_string());
        }
    }
    if members.is_empty() {
        return Err(anyhow!("Group '{}' needs at least one account", name));
    }

    let known = Table::<Account>::load(store)?;
    for m in &members {
        if !known.list().iter().any(|a| &a.name == m) {
            warn!(group = %name, account = %m, "group member has no matching account");
        }
    }

    let mut table = Table::<AccountGroup>::load(store)?;
    let id = table.upsert(AccountGroup {
        id: 0,
        name,
        accounts: members,
    });
    table.save(store)?;
    table
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Group #{} vanished after insert", id))
}

pub fn summaries(store: &dyn TableStore) -> Result<Vec<GroupSummary>> {
    let groups = Table::<AccountGroup>::load(store)?.into_rows();
    let accounts = Table::<Account>::load(store)?.into_rows();
    let trades = Table::<Trade>::load(store)?.into_rows();
    Ok(groups
        .iter()
        .map(|g| group_summary(g, &accounts, &trades))
        .collect())
}

fn list(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = summaries(store)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(store)?.currency;
    let rows = data
        .iter()
        .map(|g| {
            vec![
                g.name.clone(),
                g.members.join(", "),
                fmt_money(&g.journal_pnl, &ccy),
                fmt_money(&g.balance_gain, &ccy),
                g.missing.join(", "),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Group", "Accounts", "Journal PnL", "Balance gain", "Unknown"],
            rows,
        )
    );
    Ok(())
}
