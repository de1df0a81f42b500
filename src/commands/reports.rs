// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::ledger::{EquityPoint, Summary, daily_pnl, equity_curve, summarize};
use crate::models::{FinanceEntry, Trade};
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::{fmt_money, fmt_ratio, maybe_print_json, optional, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

fn load_trades(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Vec<Trade>> {
    let mut trades = Table::<Trade>::load(store)?.into_rows();
    if let Some(acct) = optional(sub, "account") {
        trades.retain(|t| t.account == acct);
    }
    Ok(trades)
}

/// Finance entries belong to no account, so an `--account` summary leaves
/// them out and its net is that account's journal PnL alone.
pub fn dashboard_summary(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Summary> {
    let trades = load_trades(store, sub)?;
    let entries = match optional(sub, "account") {
        Some(_) => Vec::new(),
        None => Table::<FinanceEntry>::load(store)?.into_rows(),
    };
    let settings = Settings::load(store)?;
    Ok(summarize(&trades, &entries, &settings))
}

pub fn dashboard(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let summary = dashboard_summary(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    if summary.trades == 0 {
        println!("No trades yet. Log one with `tradebook trade add` to see statistics.");
    }
    let settings = Settings::load(store)?;
    let ccy = settings.currency.as_str();
    let avg_rr = summary
        .average_risk_reward
        .map(|rr| format!("{:.2}", rr))
        .unwrap_or_else(|| "n/a".to_string());
    let account = optional(sub, "account");
    let mut rows = vec![
        vec!["Trades".into(), summary.trades.to_string()],
        vec!["Gross PnL (trades)".into(), fmt_money(&summary.gross_pnl, ccy)],
    ];
    if account.is_none() {
        rows.push(vec![
            "Cash balance (finances)".into(),
            fmt_money(&summary.cash_balance, ccy),
        ]);
        rows.push(vec!["Net".into(), fmt_money(&summary.net, ccy)]);
    }
    rows.extend([
        vec![
            "Win rate".into(),
            format!("{:.1}%", summary.win_rate.round_dp(1)),
        ],
        vec![
            "W / L / BE".into(),
            format!(
                "{} / {} / {}",
                summary.outcomes.wins, summary.outcomes.losses, summary.outcomes.break_even
            ),
        ],
        vec!["Avg R:R".into(), avg_rr],
        vec![
            format!("Winning days (>= {})", settings.winning_day_threshold),
            summary.winning_days.to_string(),
        ],
    ]);
    match account {
        Some(name) => println!("Account: {} (finances excluded)", name),
        None => rows.push(vec![
            format!("Payouts vs goal ({})", fmt_money(&settings.payout_goal, ccy)),
            format!(
                "{} ({})",
                fmt_money(&summary.payouts, ccy),
                fmt_ratio(&summary.payout_goal_progress)
            ),
        ]),
    }
    println!("{}", pretty_table(&["Metric", "Value"], rows));

    if !summary.by_strategy.is_empty() {
        let rows = summary
            .by_strategy
            .iter()
            .map(|(s, pnl)| vec![s.clone(), fmt_money(pnl, ccy)])
            .collect();
        println!("{}", pretty_table(&["Strategy", "PnL"], rows));
    }
    Ok(())
}

pub fn curve_points(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Vec<EquityPoint>> {
    Ok(equity_curve(&load_trades(store, sub)?))
}

pub fn curve(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = curve_points(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(store)?.currency;
    let rows = data
        .iter()
        .map(|p| {
            vec![
                p.date.to_string(),
                p.trade_id.to_string(),
                fmt_money(&p.pnl, &ccy),
                fmt_money(&p.equity, &ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Trade", "PnL", "Cumulative"], rows)
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct DayRow {
    pub date: NaiveDate,
    pub pnl: Decimal,
    pub winning: bool,
}

pub fn day_rows(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Vec<DayRow>> {
    let threshold = Settings::load(store)?.winning_day_threshold;
    Ok(daily_pnl(&load_trades(store, sub)?)
        .into_iter()
        .map(|(date, pnl)| DayRow {
            date,
            pnl,
            winning: pnl >= threshold,
        })
        .collect())
}

pub fn days(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = day_rows(store, sub)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let ccy = Settings::load(store)?.currency;
    let rows = data
        .iter()
        .map(|d| {
            vec![
                d.date.to_string(),
                fmt_money(&d.pnl, &ccy),
                if d.winning { "yes".into() } else { String::new() },
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "PnL", "Winning"], rows));
    Ok(())
}
