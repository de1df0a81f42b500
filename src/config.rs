// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{StoreError, StoreResult};
use crate::store::{Row, TableStore};
use crate::table::coerce_decimal;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub const SETTINGS_TABLE: &str = "settings";
const SETTINGS_COLUMNS: &[&str] = &["key", "value"];

pub const KEYS: [&str; 5] = [
    "winning_day_threshold",
    "payout_goal",
    "daily_loss_limit",
    "max_trading_hours",
    "currency",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Summed daily PnL at or above this counts as a winning day.
    pub winning_day_threshold: Decimal,
    /// Target for the cumulative payout total.
    pub payout_goal: Decimal,
    pub daily_loss_limit: Decimal,
    pub max_trading_hours: Decimal,
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            winning_day_threshold: Decimal::from(150),
            payout_goal: Decimal::from(10_000),
            daily_loss_limit: Decimal::from(500),
            max_trading_hours: Decimal::from(3),
            currency: "USD".to_string(),
        }
    }
}

impl Settings {
    /// Stored values override defaults key by key.
    pub fn load(store: &dyn TableStore) -> StoreResult<Self> {
        let mut s = Settings::default();
        for (key, value) in load_pairs(store)? {
            // Anything unparsable in storage falls back to the default.
            let _ = s.apply(&key, &value);
        }
        Ok(s)
    }

    pub fn apply(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let number = || {
            coerce_decimal(value).ok_or_else(|| {
                StoreError::Config(format!("Invalid number '{}' for {}", value, key))
            })
        };
        match key {
            "winning_day_threshold" => self.winning_day_threshold = number()?,
            "payout_goal" => self.payout_goal = number()?,
            "daily_loss_limit" => self.daily_loss_limit = number()?,
            "max_trading_hours" => self.max_trading_hours = number()?,
            "currency" => self.currency = value.trim().to_uppercase(),
            other => {
                return Err(StoreError::Config(format!(
                    "Unknown setting '{}' (known: {})",
                    other,
                    KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        vec![
            ("winning_day_threshold".into(), self.winning_day_threshold.to_string()),
            ("payout_goal".into(), self.payout_goal.to_string()),
            ("daily_loss_limit".into(), self.daily_loss_limit.to_string()),
            ("max_trading_hours".into(), self.max_trading_hours.to_string()),
            ("currency".into(), self.currency.clone()),
        ]
    }
}

fn load_pairs(store: &dyn TableStore) -> StoreResult<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for row in store.load(SETTINGS_TABLE)? {
        if let (Some(k), Some(v)) = (row.first(), row.get(1)) {
            out.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    Ok(out)
}

/// Validates `value` for `key` and persists it.
pub fn set_value(store: &dyn TableStore, key: &str, value: &str) -> StoreResult<Settings> {
    let mut settings = Settings::load(store)?;
    settings.apply(key, value)?;
    let mut pairs = load_pairs(store)?;
    if let Some((_, normalized)) = settings.pairs().into_iter().find(|(k, _)| k == key) {
        pairs.insert(key.to_string(), normalized);
    }
    let rows: Vec<Row> = pairs.into_iter().map(|(k, v)| vec![k, v]).collect();
    store.save(SETTINGS_TABLE, SETTINGS_COLUMNS, &rows)?;
    Ok(settings)
}
