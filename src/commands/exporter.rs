// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Trade;
use crate::store::TableStore;
use crate::table::{Record, Table};
use crate::utils::required;
use anyhow::{Result, anyhow};

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trades", sub)) => export_trades(store, sub),
        _ => Ok(()),
    }
}

fn export_trades(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let trades = Table::<Trade>::load(store)?.into_rows();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(Trade::COLUMNS)?;
            for t in &trades {
                wtr.write_record(t.to_row())?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&trades)?)?;
        }
        other => {
            return Err(anyhow!("Unknown format: {} (use csv|json)", other));
        }
    }
    println!("Exported {} trade(s) to {}", trades.len(), out);
    Ok(())
}
