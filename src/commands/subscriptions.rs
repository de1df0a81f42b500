// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::ledger::saturating_sum;
use crate::models::Subscription;
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::{
    fmt_money, maybe_print_json, next_renewal, parse_decimal, pretty_table, required, today,
};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let service = required(sub, "service")?.to_string();
            let amount = parse_decimal(required(sub, "amount")?)?.abs();
            let day = *sub
                .get_one::<u32>("day")
                .ok_or_else(|| anyhow!("Missing --day"))?;
            let mut table = Table::<Subscription>::load(store)?;
            let id = table.upsert(Subscription {
                id: 0,
                service: service.clone(),
                monthly_amount: amount,
                renewal_day: day,
            });
            table.save(store)?;
            println!(
                "Added subscription #{} '{}' {} / month, renews day {}",
                id, service, amount, day
            );
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
            let mut table = Table::<Subscription>::load(store)?;
            if !table.delete(id) {
                return Err(anyhow!("Subscription #{} not found", id));
            }
            table.save(store)?;
            println!("Removed subscription #{}", id);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct RenewalRow {
    pub id: i64,
    pub service: String,
    pub monthly_amount: Decimal,
    pub renewal_day: u32,
    pub next_renewal: Option<NaiveDate>,
}

pub fn monthly_total(subs: &[Subscription]) -> Decimal {
    saturating_sum(subs.iter().map(|s| s.monthly_amount))
}

/// Subscriptions ordered by their next renewal on or after `from`.
pub fn renewals(subs: &[Subscription], from: NaiveDate) -> Vec<RenewalRow> {
    let mut rows: Vec<RenewalRow> = subs
        .iter()
        .map(|s| RenewalRow {
            id: s.id,
            service: s.service.clone(),
            monthly_amount: s.monthly_amount,
            renewal_day: s.renewal_day,
            next_renewal: next_renewal(from, s.renewal_day),
        })
        .collect();
    rows.sort_by_key(|r| r.next_renewal);
    rows
}

fn list(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let subs = Table::<Subscription>::load(store)?.into_rows();
    let data = renewals(&subs, today());
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(store)?.currency;
    let rows = data
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.service.clone(),
                fmt_money(&r.monthly_amount, &ccy),
                r.renewal_day.to_string(),
                r.next_renewal.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Service", "Monthly", "Day", "Next renewal"], rows)
    );
    println!("Monthly total: {}", fmt_money(&monthly_total(&subs), &ccy));
    Ok(())
}
