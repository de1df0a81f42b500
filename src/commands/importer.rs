// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::checklist::Strategy;
use crate::models::{Outcome, Trade};
use crate::store::TableStore;
use crate::table::{Cells, Record, Table};
use crate::utils::required;
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{info, warn};

// Positions in `Trade::COLUMNS`.
const OUTCOME: usize = 5;
const RISK_REWARD: usize = 6;
const PNL: usize = 7;

static HEADER_JUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));
static PAREN_NEGATIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\s*(.+?)\s*\)$").expect("valid regex"));

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trades", sub)) => {
            let path = required(sub, "path")?;
            let n = import_trades(store, path)?;
            println!("Imported {} trade(s) from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// "Risk Reward" -> "risk_reward"
fn normalize_header(h: &str) -> String {
    HEADER_JUNK
        .replace_all(&h.trim().to_ascii_lowercase(), "_")
        .trim_matches('_')
        .to_string()
}

fn column_for(header: &str) -> Option<&'static str> {
    let col = match header {
        "date" | "day" | "trade_date" | "fecha" => "date",
        "account" | "account_name" | "cuenta" => "account",
        "instrument" | "asset" | "symbol" | "ticker" | "activo" => "instrument",
        "strategy" | "setup" | "estrategia" => "strategy",
        "outcome" | "result" | "resultado" => "outcome",
        "rr" | "r_r" | "risk_reward" | "riskreward" => "risk_reward",
        "pnl" | "p_l" | "profit" | "profit_loss" => "pnl",
        "emotion" | "mood" => "emotion",
        "screenshot" | "screenshot_url" | "image" => "screenshot",
        "notes" | "note" | "comments" | "notas" => "notes",
        _ => return None,
    };
    Some(col)
}

/// Accounting-style "(120.50)" becomes "-120.50".
fn normalize_amount(raw: &str) -> String {
    match PAREN_NEGATIVE.captures(raw.trim()) {
        Some(c) => format!("-{}", &c[1]),
        None => raw.trim().to_string(),
    }
}

fn canonical_strategy(raw: &str) -> String {
    raw.parse::<Strategy>()
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|_| raw.trim().to_string())
}

/// Appends every row of the CSV at `path` to the trades table. Cells that do
/// not parse are coerced rather than rejected; a missing outcome is inferred
/// from the sign of the PnL.
pub fn import_trades(store: &dyn TableStore, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let headers = rdr.headers()?.clone();
    let mapping: Vec<Option<usize>> = headers
        .iter()
        .map(|h| {
            let header = normalize_header(h);
            let target = column_for(&header);
            // Ids are reassigned on append.
            if target.is_none() && header != "id" {
                warn!(header = h, "ignoring unknown column");
            }
            target.and_then(|c| Trade::COLUMNS.iter().position(|k| *k == c))
        })
        .collect();
    let date_pos = Trade::COLUMNS.iter().position(|k| *k == "date");
    if !mapping.iter().any(|m| *m == date_pos) {
        warn!(path, "no date column; imported trades are dated 1970-01-01");
    }

    let mut table = Table::<Trade>::load(store)?;
    let mut imported = 0usize;
    for result in rdr.records() {
        let rec = result?;
        let mut row = vec![String::new(); Trade::COLUMNS.len()];
        for (i, cell) in rec.iter().enumerate() {
            if let Some(Some(pos)) = mapping.get(i) {
                row[*pos] = cell.trim().to_string();
            }
        }
        let outcome_missing = row[OUTCOME].is_empty();
        row[RISK_REWARD] = normalize_amount(&row[RISK_REWARD]);
        row[PNL] = normalize_amount(&row[PNL]);

        let mut trade = Trade::from_row(&Cells::new(Trade::TABLE, Trade::COLUMNS, &row));
        trade.id = 0;
        trade.strategy = canonical_strategy(&trade.strategy);
        if outcome_missing {
            trade.outcome = if trade.pnl > Decimal::ZERO {
                Outcome::Win
            } else if trade.pnl < Decimal::ZERO {
                Outcome::Loss
            } else {
                Outcome::BreakEven
            };
        }
        table.upsert(trade);
        imported += 1;
    }
    table.save(store)?;
    info!(imported, path, "trades imported");
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_fold_to_known_columns() {
        assert_eq!(normalize_header(" Risk Reward "), "risk_reward");
        assert_eq!(normalize_header("P&L"), "p_l");
        assert_eq!(column_for(&normalize_header("R:R")), Some("risk_reward"));
        assert_eq!(column_for(&normalize_header("Ticker")), Some("instrument"));
        assert_eq!(column_for(&normalize_header("Broker")), None);
        let legacy: Vec<_> = ["Fecha", "Activo", "Estrategia", "Resultado", "PnL", "Notas"]
            .iter()
            .map(|h| column_for(&normalize_header(h)))
            .collect();
        assert_eq!(
            legacy,
            [
                Some("date"),
                Some("instrument"),
                Some("strategy"),
                Some("outcome"),
                Some("pnl"),
                Some("notes"),
            ]
        );
    }

    #[test]
    fn accounting_negatives() {
        assert_eq!(normalize_amount("(120.50)"), "-120.50");
        assert_eq!(normalize_amount(" ( 7 ) "), "-7");
        assert_eq!(normalize_amount("42"), "42");
        assert_eq!(canonical_strategy("Narrow Channel"), "narrow-channel");
        assert_eq!(canonical_strategy(" scalp "), "scalp");
        assert_eq!(canonical_strategy("Canales Estrechos"), "narrow-channel");
        assert_eq!(canonical_strategy("Otro"), "Otro");
    }
}
