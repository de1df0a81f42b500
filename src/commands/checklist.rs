// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::checklist::{RiskGuard, Strategy, Verdict, evaluate};
use crate::config::Settings;
use crate::ledger::daily_pnl;
use crate::models::Trade;
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::{optional, parse_decimal, pretty_table, required, today};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    let strategy = parse_strategy(m)?;
    if m.get_flag("questions") {
        let rows = strategy
            .conditions()
            .iter()
            .map(|c| vec![c.key.to_string(), c.question.to_string()])
            .collect();
        println!("{}", pretty_table(&["Key", "Condition"], rows));
        return Ok(());
    }

    match verdict(store, m)? {
        Verdict::Blocked(reasons) => {
            println!("STOP: no trading today.");
            for r in reasons {
                println!("  - {}", r);
            }
        }
        Verdict::Incomplete(missing) => {
            println!("Checklist incomplete for {}. Missing:", strategy);
            for key in missing {
                let question = strategy
                    .conditions()
                    .iter()
                    .find(|c| c.key == key)
                    .map(|c| c.question)
                    .unwrap_or("");
                println!("  - {} ({})", key, question);
            }
        }
        Verdict::Valid => {
            println!("VALID SETUP ({}): {}", strategy, strategy.advice());
        }
        Verdict::APlus => {
            println!("VALID SETUP ({}): {}", strategy, strategy.advice());
            println!("A+ TRADE CONFIRMED (liquidity reaction)");
        }
    }
    Ok(())
}

fn parse_strategy(m: &clap::ArgMatches) -> Result<Strategy> {
    required(m, "strategy")?
        .parse::<Strategy>()
        .map_err(|e| anyhow!(e))
}

/// Today's realised loss from the journal, as a magnitude. Zero on a green day.
pub fn todays_loss(trades: &[Trade]) -> Decimal {
    let pnl = daily_pnl(trades)
        .get(&today())
        .copied()
        .unwrap_or(Decimal::ZERO);
    if pnl < Decimal::ZERO { -pnl } else { Decimal::ZERO }
}

pub fn verdict(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<Verdict> {
    let strategy = parse_strategy(m)?;
    let confirmed: Vec<&str> = m
        .get_many::<String>("yes")
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .collect();
    let unknown = strategy.unknown(&confirmed);
    if !unknown.is_empty() {
        return Err(anyhow!(
            "Unknown condition(s) for {}: {} (see --questions)",
            strategy,
            unknown.join(", ")
        ));
    }

    let settings = Settings::load(store)?;
    let daily_loss = match optional(m, "daily_loss") {
        Some(v) => parse_decimal(v)?,
        None => todays_loss(&Table::<Trade>::load(store)?.into_rows()),
    };
    let hours = parse_decimal(required(m, "hours")?)?;
    let guard = RiskGuard::new(&settings, daily_loss, hours);

    Ok(evaluate(strategy, &confirmed, m.get_flag("liquidity"), &guard))
}
