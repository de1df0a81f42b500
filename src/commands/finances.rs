// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::ledger::{finance_balance, payout_total};
use crate::models::{FinanceEntry, FinanceKind};
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::{
    fmt_money, maybe_print_json, optional, parse_date, parse_decimal, pretty_table, required,
    today,
};
use anyhow::{Result, anyhow, bail};
use rust_decimal::Decimal;
use tracing::info;

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let e = add(store, sub)?;
            println!(
                "Recorded {} {} on {} ({})",
                e.kind, e.amount, e.date, e.concept
            );
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
            let mut table = Table::<FinanceEntry>::load(store)?;
            if !table.delete(id) {
                return Err(anyhow!("Finance entry #{} not found", id));
            }
            table.save(store)?;
            println!("Removed finance entry #{}", id);
        }
        _ => {}
    }
    Ok(())
}

/// The amount is taken as a magnitude and signed by its kind here, once.
pub fn add(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<FinanceEntry> {
    let kind = required(sub, "kind")?
        .parse::<FinanceKind>()
        .map_err(|e| anyhow!(e))?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    if amount < Decimal::ZERO {
        bail!("Amount must be a positive magnitude; the sign follows --kind");
    }
    let entry = FinanceEntry {
        id: 0,
        date: match optional(sub, "date") {
            Some(d) => parse_date(d)?,
            None => today(),
        },
        kind,
        concept: optional(sub, "concept").unwrap_or("").to_string(),
        amount: kind.signed(amount),
    };
    let mut table = Table::<FinanceEntry>::load(store)?;
    let id = table.upsert(entry);
    table.save(store)?;
    info!(id, %kind, "finance entry recorded");
    table
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Finance entry #{} vanished after insert", id))
}

fn list(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let mut data = Table::<FinanceEntry>::load(store)?.into_rows();
    if let Some(k) = optional(sub, "kind") {
        let kind = k.parse::<FinanceKind>().map_err(|e| anyhow!(e))?;
        data.retain(|e| e.kind == kind);
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(store)?.currency;
    let balance = finance_balance(&data);
    let payouts = payout_total(&data);
    let rows = data
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.date.to_string(),
                e.kind.to_string(),
                e.concept.clone(),
                fmt_money(&e.amount, &ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Kind", "Concept", "Amount"], rows)
    );
    println!(
        "Cash balance: {}   Payouts: {}",
        fmt_money(&balance, &ccy),
        fmt_money(&payouts, &ccy)
    );
    Ok(())
}
