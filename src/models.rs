// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "WIN")]
    Win,
    #[serde(rename = "LOSS")]
    Loss,
    #[serde(rename = "BE")]
    BreakEven,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "WIN",
            Outcome::Loss => "LOSS",
            Outcome::BreakEven => "BE",
        }
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WIN" | "W" => Ok(Outcome::Win),
            "LOSS" | "L" => Ok(Outcome::Loss),
            "BE" | "BREAK-EVEN" | "BREAKEVEN" | "BREAK EVEN" => Ok(Outcome::BreakEven),
            other => Err(format!("Unknown outcome '{}' (use WIN|LOSS|BE)", other)),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub date: NaiveDate,
    pub account: String,
    pub instrument: String,
    pub strategy: String,
    pub outcome: Outcome,
    pub risk_reward: Decimal,
    pub pnl: Decimal,
    pub emotion: String,
    pub screenshot: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Trial,
    Funded,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Trial => "trial",
            AccountKind::Funded => "funded",
        }
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trial" | "evaluation" | "challenge" => Ok(AccountKind::Trial),
            "funded" | "live" => Ok(AccountKind::Funded),
            other => Err(format!("Unknown account type '{}' (use trial|funded)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Historic,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Historic => "historic",
        }
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "historic" | "closed" => Ok(AccountStatus::Historic),
            other => Err(format!("Unknown status '{}' (use active|historic)", other)),
        }
    }
}

/// A tracked capital pool. `current_balance` is entered by hand and is never
/// derived from the trades logged under this account's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub firm: String,
    pub kind: AccountKind,
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
    pub target_balance: Decimal,
    pub target_days: u32,
    pub cost: Decimal,
    pub status: AccountStatus,
    pub created: NaiveDate,
}

/// Kind of finance movement. The kind alone decides the sign of the stored amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinanceKind {
    PropFirm,
    Software,
    Education,
    OtherExpense,
    Payout,
}

impl FinanceKind {
    pub const ALL: [FinanceKind; 5] = [
        FinanceKind::PropFirm,
        FinanceKind::Software,
        FinanceKind::Education,
        FinanceKind::OtherExpense,
        FinanceKind::Payout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FinanceKind::PropFirm => "prop-firm",
            FinanceKind::Software => "software",
            FinanceKind::Education => "education",
            FinanceKind::OtherExpense => "other-expense",
            FinanceKind::Payout => "payout",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, FinanceKind::Payout)
    }

    /// Signed amount for a magnitude entered by the user.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        if self.is_income() {
            amount.abs()
        } else {
            -amount.abs()
        }
    }
}

impl FromStr for FinanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        FinanceKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| {
                format!(
                    "Unknown finance kind '{}' (use prop-firm|software|education|other-expense|payout)",
                    s.trim()
                )
            })
    }
}

impl fmt::Display for FinanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: FinanceKind,
    pub concept: String,
    pub amount: Decimal, // signed at write time
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Once,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Once => "once",
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "once" | "" => Ok(Frequency::Once),
            other => Err(format!(
                "Unknown frequency '{}' (use daily|weekly|monthly|once)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveStatus {
    Pending,
    Done,
}

impl ObjectiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveStatus::Pending => "pending",
            ObjectiveStatus::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: i64,
    pub task: String,
    pub frequency: Frequency,
    pub due: Option<NaiveDate>,
    pub status: ObjectiveStatus,
    pub target_money: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub id: i64,
    pub service: String,
    pub monthly_amount: Decimal,
    pub renewal_day: u32, // 1..=31
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountGroup {
    pub id: i64,
    pub name: String,
    pub accounts: Vec<String>,
}
