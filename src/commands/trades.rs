// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::{Outcome, Trade};
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::{
    fmt_money, maybe_print_json, optional, parse_date, parse_decimal, pretty_table, required,
    today,
};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use tracing::info;

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let trade = add(store, sub)?;
            println!(
                "Recorded trade #{} {} {} {} on {} (acct: {})",
                trade.id, trade.outcome, trade.instrument, trade.pnl, trade.date, trade.account
            );
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("edit", sub)) => {
            let trade = edit(store, sub)?;
            println!("Updated trade #{}", trade.id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
            let mut table = Table::<Trade>::load(store)?;
            if !table.delete(id) {
                return Err(anyhow!("Trade #{} not found", id));
            }
            table.save(store)?;
            info!(id, "trade removed");
            println!("Removed trade #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_outcome(raw: &str) -> Result<Outcome> {
    raw.parse::<Outcome>().map_err(|e| anyhow!(e))
}

pub fn add(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Trade> {
    let date = match optional(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let trade = Trade {
        id: 0,
        date,
        account: required(sub, "account")?.to_string(),
        instrument: required(sub, "instrument")?.to_string(),
        strategy: optional(sub, "strategy").unwrap_or("").to_string(),
        outcome: parse_outcome(required(sub, "outcome")?)?,
        risk_reward: match optional(sub, "rr") {
            Some(rr) => parse_decimal(rr)?,
            None => Decimal::ZERO,
        },
        pnl: parse_decimal(required(sub, "pnl")?)?,
        emotion: optional(sub, "emotion").unwrap_or("").to_string(),
        screenshot: optional(sub, "screenshot").unwrap_or("").to_string(),
        notes: optional(sub, "notes").unwrap_or("").to_string(),
    };

    let mut table = Table::<Trade>::load(store)?;
    let id = table.upsert(trade);
    table.save(store)?;
    info!(id, "trade recorded");
    table
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Trade #{} vanished after insert", id))
}

/// Overwrites only the fields given on the command line.
pub fn edit(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Trade> {
    let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
    let mut table = Table::<Trade>::load(store)?;
    let trade = table
        .get_mut(id)
        .ok_or_else(|| anyhow!("Trade #{} not found", id))?;

    if let Some(d) = optional(sub, "date") {
        trade.date = parse_date(d)?;
    }
    if let Some(v) = optional(sub, "account") {
        trade.account = v.to_string();
    }
    if let Some(v) = optional(sub, "instrument") {
        trade.instrument = v.to_string();
    }
    if let Some(v) = optional(sub, "strategy") {
        trade.strategy = v.to_string();
    }
    if let Some(v) = optional(sub, "outcome") {
        trade.outcome = parse_outcome(v)?;
    }
    if let Some(v) = optional(sub, "rr") {
        trade.risk_reward = parse_decimal(v)?;
    }
    if let Some(v) = optional(sub, "pnl") {
        trade.pnl = parse_decimal(v)?;
    }
    if let Some(v) = optional(sub, "emotion") {
        trade.emotion = v.to_string();
    }
    if let Some(v) = optional(sub, "screenshot") {
        trade.screenshot = v.to_string();
    }
    if let Some(v) = optional(sub, "notes") {
        trade.notes = v.to_string();
    }
    let updated = trade.clone();
    table.save(store)?;
    info!(id, "trade edited");
    Ok(updated)
}

/// Trades in row order, optionally filtered by account; `--limit` keeps the last N.
pub fn query_rows(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Vec<Trade>> {
    let mut rows: Vec<Trade> = Table::<Trade>::load(store)?.into_rows();
    if let Some(acct) = optional(sub, "account") {
        rows.retain(|t| t.account == acct);
    }
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(0);
    if limit > 0 && rows.len() > limit {
        rows.drain(..rows.len() - limit);
    }
    Ok(rows)
}

fn list(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(store)?.currency;
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.account.clone(),
                t.instrument.clone(),
                t.strategy.clone(),
                t.outcome.to_string(),
                t.risk_reward.to_string(),
                fmt_money(&t.pnl, &ccy),
                t.emotion.clone(),
                t.notes.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Date", "Account", "Instrument", "Strategy", "Result", "R:R", "PnL",
                "Emotion", "Notes",
            ],
            rows,
        )
    );
    Ok(())
}
