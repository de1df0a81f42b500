// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, set_value};
use crate::store::TableStore;
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::Result;
use tracing::info;

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let settings = Settings::load(store)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
                let rows = settings
                    .pairs()
                    .into_iter()
                    .map(|(k, v)| vec![k, v])
                    .collect();
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let key = required(sub, "key")?;
            let value = required(sub, "value")?;
            set_value(store, key, value)?;
            info!(key, value, "setting changed");
            println!("{} set to {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
