// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;

use tradebook::{cli, commands, db, logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    logging::init_logging(matches.get_count("verbose"));

    let backend = matches
        .get_one::<String>("backend")
        .map(|s| s.parse::<db::Backend>())
        .transpose()?
        .unwrap_or_default();
    let explicit = matches.get_one::<String>("data_dir").map(PathBuf::from);
    let dir = db::data_dir(explicit.as_deref())?;
    let store = db::open_store(backend, &dir)?;
    let store = store.as_ref();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Data directory ready at {} ({:?})", dir.display(), backend);
        }
        Some(("trade", sub)) => commands::trades::handle(store, sub)?,
        Some(("account", sub)) => commands::accounts::handle(store, sub)?,
        Some(("finance", sub)) => commands::finances::handle(store, sub)?,
        Some(("objective", sub)) => commands::objectives::handle(store, sub)?,
        Some(("sub", sub)) => commands::subscriptions::handle(store, sub)?,
        Some(("group", sub)) => commands::groups::handle(store, sub)?,
        Some(("check", sub)) => commands::checklist::handle(store, sub)?,
        Some(("dashboard", sub)) => commands::reports::dashboard(store, sub)?,
        Some(("curve", sub)) => commands::reports::curve(store, sub)?,
        Some(("days", sub)) => commands::reports::days(store, sub)?,
        Some(("config", sub)) => commands::settings::handle(store, sub)?,
        Some(("import", sub)) => commands::importer::handle(store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(store, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
