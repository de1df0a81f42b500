// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pre-trade checklist per setup, plus the daily risk guard that blocks
//! trading altogether once a limit is hit. Nothing here is persisted.

use crate::config::Settings;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub key: &'static str,
    pub question: &'static str,
}

const RANGE: &[Condition] = &[
    Condition {
        key: "legs",
        question: "At least 3 legs (tested extremes)?",
    },
    Condition {
        key: "extreme",
        question: "Entry at an extreme, not in the middle?",
    },
    Condition {
        key: "h2l2",
        question: "Clear H2/L2 pattern?",
    },
    Condition {
        key: "impulse",
        question: "Favourable impulse count?",
    },
];

const WIDE_CHANNEL: &[Condition] = &[
    Condition {
        key: "with-trend",
        question: "With the trend (long leg)?",
    },
    Condition {
        key: "pullback",
        question: "Quality pullback (2-3 legs)?",
    },
    Condition {
        key: "h2l2",
        question: "H2/L2 visible?",
    },
];

const NARROW_CHANNEL: &[Condition] = &[
    Condition {
        key: "half-retrace",
        question: "Retrace to 50%?",
    },
    Condition {
        key: "short-pullback",
        question: "Pullback lasted 3 bars or fewer?",
    },
    Condition {
        key: "no-strong-bars",
        question: "No 3 strong bars against?",
    },
    Condition {
        key: "no-rejection",
        question: "No rejection with a large wick?",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Range,
    WideChannel,
    NarrowChannel,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Range,
        Strategy::WideChannel,
        Strategy::NarrowChannel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Range => "range",
            Strategy::WideChannel => "wide-channel",
            Strategy::NarrowChannel => "narrow-channel",
        }
    }

    pub fn conditions(&self) -> &'static [Condition] {
        match self {
            Strategy::Range => RANGE,
            Strategy::WideChannel => WIDE_CHANNEL,
            Strategy::NarrowChannel => NARROW_CHANNEL,
        }
    }

    /// Execution plan shown once the setup passes.
    pub fn advice(&self) -> &'static str {
        match self {
            Strategy::Range => "Aim for 2:1. Exit if it has not broken out within 10 bars.",
            Strategy::WideChannel => {
                "Stop beyond the previous leg. Trail the stop with each new swing."
            }
            Strategy::NarrowChannel => "Use a limit order. Target 1:1 at the previous extreme.",
        }
    }

    /// Required conditions not among `confirmed`.
    pub fn missing(&self, confirmed: &[&str]) -> Vec<&'static str> {
        self.conditions()
            .iter()
            .map(|c| c.key)
            .filter(|k| !confirmed.contains(k))
            .collect()
    }

    /// True iff every required condition is confirmed.
    pub fn is_valid(&self, confirmed: &[&str]) -> bool {
        self.missing(confirmed).is_empty()
    }

    /// Keys in `confirmed` that are not conditions of this setup.
    pub fn unknown<'a>(&self, confirmed: &[&'a str]) -> Vec<&'a str> {
        confirmed
            .iter()
            .copied()
            .filter(|k| !self.conditions().iter().any(|c| c.key == *k))
            .collect()
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match key.as_str() {
            "range" | "ranges" | "rango" | "rangos" => Ok(Strategy::Range),
            "wide-channel" | "wide" | "canal-ancho" | "canales-anchos" => {
                Ok(Strategy::WideChannel)
            }
            "narrow-channel" | "narrow" | "tight-channel" | "canal-estrecho"
            | "canales-estrechos" => Ok(Strategy::NarrowChannel),
            _ => Err(format!(
                "Unknown strategy '{}' (use range|wide-channel|narrow-channel)",
                s.trim()
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskGuard {
    pub daily_loss: Decimal,
    pub hours: Decimal,
    pub loss_limit: Decimal,
    pub max_hours: Decimal,
}

impl RiskGuard {
    /// `daily_loss` is a magnitude; a negative PnL figure is accepted as well.
    pub fn new(settings: &Settings, daily_loss: Decimal, hours: Decimal) -> Self {
        Self {
            daily_loss: daily_loss.abs(),
            hours,
            loss_limit: settings.daily_loss_limit,
            max_hours: settings.max_trading_hours,
        }
    }

    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.daily_loss >= self.loss_limit {
            out.push(format!(
                "daily loss limit reached ({} >= {})",
                self.daily_loss, self.loss_limit
            ));
        }
        if self.hours >= self.max_hours {
            out.push(format!(
                "trading time limit reached ({}h >= {}h)",
                self.hours, self.max_hours
            ));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "kebab-case")]
pub enum Verdict {
    /// A daily limit is hit; the checklist was not looked at.
    Blocked(Vec<String>),
    Incomplete(Vec<&'static str>),
    Valid,
    /// Valid and confirmed by a reaction at a liquidity zone or FVG.
    APlus,
}

impl Verdict {
    pub fn allows_trade(&self) -> bool {
        matches!(self, Verdict::Valid | Verdict::APlus)
    }
}

pub fn evaluate(
    strategy: Strategy,
    confirmed: &[&str],
    liquidity: bool,
    guard: &RiskGuard,
) -> Verdict {
    let blocked = guard.violations();
    if !blocked.is_empty() {
        return Verdict::Blocked(blocked);
    }
    let missing = strategy.missing(confirmed);
    if !missing.is_empty() {
        return Verdict::Incomplete(missing);
    }
    if liquidity {
        Verdict::APlus
    } else {
        Verdict::Valid
    }
}
