// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger aggregation.
//!
//! Every function here is a pure derivation over the rows it is handed and
//! recomputes from scratch on each call. Empty input and zero denominators
//! degrade to zero (or `None` where a mean is undefined) instead of failing.
//! Sums saturate at the `Decimal` bounds rather than overflow.
//!
//! An account's journal PnL (the sum of trade PnL logged under its name) and
//! its hand-edited current balance are reported side by side and never merged.

use crate::config::Settings;
use crate::models::{Account, AccountGroup, AccountStatus, FinanceEntry, Outcome, Trade};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

pub fn total_pnl(trades: &[Trade], account: Option<&str>) -> Decimal {
    saturating_sum(
        trades
            .iter()
            .filter(|t| account.is_none_or(|a| t.account == a))
            .map(|t| t.pnl),
    )
}

/// Percentage of trades marked WIN, in `[0, 100]`. Zero when there are no trades.
pub fn win_rate(trades: &[Trade]) -> Decimal {
    if trades.is_empty() {
        return Decimal::ZERO;
    }
    let wins = trades.iter().filter(|t| t.outcome == Outcome::Win).count();
    Decimal::from(wins) * Decimal::ONE_HUNDRED / Decimal::from(trades.len())
}

/// Mean risk-reward. `None` when there is nothing to average.
pub fn average_risk_reward(trades: &[Trade]) -> Option<Decimal> {
    if trades.is_empty() {
        return None;
    }
    let sum = saturating_sum(trades.iter().map(|t| t.risk_reward));
    sum.checked_div(Decimal::from(trades.len()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub wins: usize,
    pub losses: usize,
    pub break_even: usize,
}

pub fn outcome_counts(trades: &[Trade]) -> OutcomeCounts {
    let mut c = OutcomeCounts::default();
    for t in trades {
        match t.outcome {
            Outcome::Win => c.wins += 1,
            Outcome::Loss => c.losses += 1,
            Outcome::BreakEven => c.break_even += 1,
        }
    }
    c
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub trade_id: i64,
    pub date: NaiveDate,
    pub pnl: Decimal,
    pub equity: Decimal,
}

/// Running PnL, one point per trade, in ascending date order. Trades on the
/// same date keep their row order.
pub fn equity_curve(trades: &[Trade]) -> Vec<EquityPoint> {
    let mut ordered: Vec<&Trade> = trades.iter().collect();
    ordered.sort_by_key(|t| t.date);

    let mut equity = Decimal::ZERO;
    ordered
        .into_iter()
        .map(|t| {
            equity = equity.saturating_add(t.pnl);
            EquityPoint {
                trade_id: t.id,
                date: t.date,
                pnl: t.pnl,
                equity,
            }
        })
        .collect()
}

/// PnL summed per calendar date.
pub fn daily_pnl(trades: &[Trade]) -> BTreeMap<NaiveDate, Decimal> {
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in trades {
        let day = days.entry(t.date).or_insert(Decimal::ZERO);
        *day = day.saturating_add(t.pnl);
    }
    days
}

/// Number of dates whose summed PnL is at least `threshold`.
pub fn winning_day_count(trades: &[Trade], threshold: Decimal) -> usize {
    daily_pnl(trades)
        .values()
        .filter(|pnl| **pnl >= threshold)
        .count()
}

pub fn pnl_by_strategy(trades: &[Trade]) -> BTreeMap<String, Decimal> {
    let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in trades {
        let key = if t.strategy.is_empty() {
            "(none)".to_string()
        } else {
            t.strategy.clone()
        };
        let sum = out.entry(key).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(t.pnl);
    }
    out
}

pub fn journal_pnl_by_account(trades: &[Trade]) -> BTreeMap<String, Decimal> {
    let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in trades {
        let sum = out.entry(t.account.clone()).or_insert(Decimal::ZERO);
        *sum = sum.saturating_add(t.pnl);
    }
    out
}

/// `num / den` clamped to `[0, 1]`. A quotient too large for `Decimal` clamps
/// by its sign.
fn unit_ratio(num: Decimal, den: Decimal) -> Decimal {
    match num.checked_div(den) {
        Some(q) => q.clamp(Decimal::ZERO, Decimal::ONE),
        None if num.is_sign_negative() == den.is_sign_negative() => Decimal::ONE,
        None => Decimal::ZERO,
    }
}

/// `(current - initial) / (target - initial)` clamped to `[0, 1]`; zero when
/// the target equals the initial balance or a difference overflows.
pub fn progress_ratio(initial: Decimal, current: Decimal, target: Decimal) -> Decimal {
    match (target.checked_sub(initial), current.checked_sub(initial)) {
        (Some(span), Some(gain)) if !span.is_zero() => unit_ratio(gain, span),
        _ => Decimal::ZERO,
    }
}

pub fn account_progress_ratio(account: &Account) -> Decimal {
    progress_ratio(
        account.initial_balance,
        account.current_balance,
        account.target_balance,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountProgress {
    pub name: String,
    pub status: AccountStatus,
    pub ratio: Decimal,
    /// Current balance minus initial balance, from the hand-edited balance.
    pub balance_gain: Decimal,
    /// Sum of trade PnL logged under this account name.
    pub journal_pnl: Decimal,
    pub remaining: Decimal,
    pub days_elapsed: i64,
    pub target_days: u32,
}

pub fn account_progress(account: &Account, trades: &[Trade], today: NaiveDate) -> AccountProgress {
    AccountProgress {
        name: account.name.clone(),
        status: account.status,
        ratio: account_progress_ratio(account),
        balance_gain: balance_gain_of(account),
        journal_pnl: total_pnl(trades, Some(account.name.as_str())),
        remaining: account
            .target_balance
            .saturating_sub(account.current_balance)
            .max(Decimal::ZERO),
        days_elapsed: (today - account.created).num_days().max(0),
        target_days: account.target_days,
    }
}

fn balance_gain_of(account: &Account) -> Decimal {
    account
        .current_balance
        .saturating_sub(account.initial_balance)
}

/// Balance gain minus journal PnL. Non-zero means the two sources disagree.
pub fn balance_drift(account: &Account, trades: &[Trade]) -> Decimal {
    balance_gain_of(account).saturating_sub(total_pnl(trades, Some(account.name.as_str())))
}

/// Signed sum of every finance movement.
pub fn finance_balance(entries: &[FinanceEntry]) -> Decimal {
    saturating_sum(entries.iter().map(|e| e.amount))
}

pub fn payout_total(entries: &[FinanceEntry]) -> Decimal {
    saturating_sum(
        entries
            .iter()
            .filter(|e| e.kind.is_income())
            .map(|e| e.amount),
    )
}

/// Payout total over `target`, clamped to `[0, 1]`; zero for a non-positive target.
pub fn payout_goal_progress(entries: &[FinanceEntry], target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    unit_ratio(payout_total(entries), target)
}

/// Trade PnL plus the finance cash balance.
pub fn net_result(trades: &[Trade], entries: &[FinanceEntry]) -> Decimal {
    total_pnl(trades, None).saturating_add(finance_balance(entries))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub members: Vec<String>,
    /// Members with no account of that name.
    pub missing: Vec<String>,
    pub journal_pnl: Decimal,
    pub balance_gain: Decimal,
}

pub fn group_summary(group: &AccountGroup, accounts: &[Account], trades: &[Trade]) -> GroupSummary {
    let mut missing = Vec::new();
    let mut journal_pnl = Decimal::ZERO;
    let mut balance_gain = Decimal::ZERO;
    for member in &group.accounts {
        journal_pnl = journal_pnl.saturating_add(total_pnl(trades, Some(member.as_str())));
        let matched: Vec<&Account> = accounts.iter().filter(|a| &a.name == member).collect();
        if matched.is_empty() {
            missing.push(member.clone());
        }
        for a in matched {
            balance_gain = balance_gain.saturating_add(balance_gain_of(a));
        }
    }
    GroupSummary {
        name: group.name.clone(),
        members: group.accounts.clone(),
        missing,
        journal_pnl,
        balance_gain,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub trades: usize,
    pub gross_pnl: Decimal,
    pub cash_balance: Decimal,
    pub net: Decimal,
    pub payouts: Decimal,
    pub win_rate: Decimal,
    pub average_risk_reward: Option<Decimal>,
    pub winning_days: usize,
    pub payout_goal_progress: Decimal,
    pub outcomes: OutcomeCounts,
    pub by_strategy: BTreeMap<String, Decimal>,
}

pub fn summarize(trades: &[Trade], entries: &[FinanceEntry], settings: &Settings) -> Summary {
    Summary {
        trades: trades.len(),
        gross_pnl: total_pnl(trades, None),
        cash_balance: finance_balance(entries),
        net: net_result(trades, entries),
        payouts: payout_total(entries),
        win_rate: win_rate(trades),
        average_risk_reward: average_risk_reward(trades),
        winning_days: winning_day_count(trades, settings.winning_day_threshold),
        payout_goal_progress: payout_goal_progress(entries, settings.payout_goal),
        outcomes: outcome_counts(trades),
        by_strategy: pnl_by_strategy(trades),
    }
}
