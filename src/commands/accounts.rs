// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::ledger::{AccountProgress, account_progress};
use crate::models::{Account, AccountKind, AccountStatus, Trade};
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::{
    fmt_money, fmt_ratio, maybe_print_json, optional, parse_date, parse_decimal, pretty_table,
    required, today,
};
use anyhow::{Result, anyhow};
use tracing::info;

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let a = add(store, sub)?;
            println!(
                "Added account #{} '{}' ({}, {})",
                a.id,
                a.name,
                a.kind.as_str(),
                a.firm
            );
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("set", sub)) => {
            let a = set(store, sub)?;
            println!(
                "Updated account #{} '{}' (balance {}, {})",
                a.id,
                a.name,
                a.current_balance,
                a.status.as_str()
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
            let mut table = Table::<Account>::load(store)?;
            if !table.delete(id) {
                return Err(anyhow!("Account #{} not found", id));
            }
            table.save(store)?;
            println!("Removed account #{}", id);
        }
        Some(("progress", sub)) => progress(store, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn add(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Account> {
    let initial = parse_decimal(required(sub, "initial")?)?;
    let account = Account {
        id: 0,
        name: required(sub, "name")?.to_string(),
        firm: optional(sub, "firm").unwrap_or("").to_string(),
        kind: required(sub, "type")?
            .parse::<AccountKind>()
            .map_err(|e| anyhow!(e))?,
        initial_balance: initial,
        current_balance: match optional(sub, "current") {
            Some(c) => parse_decimal(c)?,
            None => initial,
        },
        target_balance: parse_decimal(required(sub, "target")?)?,
        target_days: sub.get_one::<u32>("target_days").copied().unwrap_or(0),
        cost: parse_decimal(required(sub, "cost")?)?,
        status: AccountStatus::Active,
        created: match optional(sub, "created") {
            Some(d) => parse_date(d)?,
            None => today(),
        },
    };
    let mut table = Table::<Account>::load(store)?;
    let id = table.upsert(account);
    table.save(store)?;
    info!(id, "account added");
    table
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Account #{} vanished after insert", id))
}

/// Direct field edits. The balance is whatever the user types; trades never move it.
pub fn set(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Account> {
    let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
    let mut table = Table::<Account>::load(store)?;
    let a = table
        .get_mut(id)
        .ok_or_else(|| anyhow!("Account #{} not found", id))?;

    if let Some(v) = optional(sub, "name") {
        a.name = v.to_string();
    }
    if let Some(v) = optional(sub, "firm") {
        a.firm = v.to_string();
    }
    if let Some(v) = optional(sub, "type") {
        a.kind = v.parse::<AccountKind>().map_err(|e| anyhow!(e))?;
    }
    if let Some(v) = optional(sub, "balance") {
        a.current_balance = parse_decimal(v)?;
    }
    if let Some(v) = optional(sub, "target") {
        a.target_balance = parse_decimal(v)?;
    }
    if let Some(v) = sub.get_one::<u32>("target_days") {
        a.target_days = *v;
    }
    if let Some(v) = optional(sub, "cost") {
        a.cost = parse_decimal(v)?;
    }
    if let Some(v) = optional(sub, "status") {
        a.status = v.parse::<AccountStatus>().map_err(|e| anyhow!(e))?;
    }
    let updated = a.clone();
    table.save(store)?;
    info!(id, "account updated");
    Ok(updated)
}

fn list(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let mut data = Table::<Account>::load(store)?.into_rows();
    if let Some(s) = optional(sub, "status") {
        let status = s.parse::<AccountStatus>().map_err(|e| anyhow!(e))?;
        data.retain(|a| a.status == status);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(store)?.currency;
    let rows = data
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.name.clone(),
                a.firm.clone(),
                a.kind.as_str().to_string(),
                fmt_money(&a.initial_balance, &ccy),
                fmt_money(&a.current_balance, &ccy),
                fmt_money(&a.target_balance, &ccy),
                a.target_days.to_string(),
                fmt_money(&a.cost, &ccy),
                a.status.as_str().to_string(),
                a.created.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Name", "Firm", "Type", "Initial", "Balance", "Target", "Days", "Cost",
                "Status", "Created",
            ],
            rows,
        )
    );
    Ok(())
}

pub fn progress_rows(
    store: &dyn TableStore,
    sub: &clap::ArgMatches,
) -> Result<Vec<AccountProgress>> {
    let accounts = Table::<Account>::load(store)?.into_rows();
    let trades = Table::<Trade>::load(store)?.into_rows();
    let name = optional(sub, "name");
    let all = sub.get_flag("all");
    let now = today();
    Ok(accounts
        .iter()
        .filter(|a| name.is_none_or(|n| a.name == n))
        .filter(|a| all || name.is_some() || a.status == AccountStatus::Active)
        .map(|a| account_progress(a, &trades, now))
        .collect())
}

fn progress(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = progress_rows(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(store)?.currency;
    let rows = data
        .iter()
        .map(|p| {
            let days = if p.target_days > 0 {
                format!("{}/{}", p.days_elapsed, p.target_days)
            } else {
                p.days_elapsed.to_string()
            };
            vec![
                p.name.clone(),
                fmt_ratio(&p.ratio),
                fmt_money(&p.balance_gain, &ccy),
                fmt_money(&p.journal_pnl, &ccy),
                fmt_money(&p.remaining, &ccy),
                days,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Account", "Progress", "Balance gain", "Journal PnL", "To target", "Days"],
            rows,
        )
    );
    Ok(())
}
