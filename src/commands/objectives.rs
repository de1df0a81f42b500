// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Frequency, Objective, ObjectiveStatus};
use crate::store::TableStore;
use crate::table::Table;
use crate::utils::{maybe_print_json, optional, parse_date, parse_decimal, pretty_table, required};
use anyhow::{Result, anyhow};

pub fn handle(store: &dyn TableStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let o = add(store, sub)?;
            println!("Added objective #{} '{}'", o.id, o.task);
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("done", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
            mark_done(store, id)?;
            println!("Objective #{} done", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("Missing --id"))?;
            let mut table = Table::<Objective>::load(store)?;
            if !table.delete(id) {
                return Err(anyhow!("Objective #{} not found", id));
            }
            table.save(store)?;
            println!("Removed objective #{}", id);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<Objective> {
    let objective = Objective {
        id: 0,
        task: required(sub, "task")?.to_string(),
        frequency: required(sub, "frequency")?
            .parse::<Frequency>()
            .map_err(|e| anyhow!(e))?,
        due: optional(sub, "due").map(parse_date).transpose()?,
        status: ObjectiveStatus::Pending,
        target_money: optional(sub, "target_money")
            .map(parse_decimal)
            .transpose()?,
    };
    let mut table = Table::<Objective>::load(store)?;
    let id = table.upsert(objective);
    table.save(store)?;
    table
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow!("Objective #{} vanished after insert", id))
}

pub fn mark_done(store: &dyn TableStore, id: i64) -> Result<()> {
    let mut table = Table::<Objective>::load(store)?;
    let o = table
        .get_mut(id)
        .ok_or_else(|| anyhow!("Objective #{} not found", id))?;
    o.status = ObjectiveStatus::Done;
    table.save(store)?;
    Ok(())
}

fn list(store: &dyn TableStore, sub: &clap::ArgMatches) -> Result<()> {
    let mut data = Table::<Objective>::load(store)?.into_rows();
    if sub.get_flag("pending") {
        data.retain(|o| o.status == ObjectiveStatus::Pending);
    }
    // Pending first, then by due date with undated last.
    data.sort_by_key(|o| (o.status == ObjectiveStatus::Done, o.due.is_none(), o.due));
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|o| {
            vec![
                o.id.to_string(),
                o.task.clone(),
                o.frequency.as_str().to_string(),
                o.due.map(|d| d.to_string()).unwrap_or_default(),
                o.status.as_str().to_string(),
                o.target_money.map(|d| format!("{:.2}", d)).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Task", "Frequency", "Due", "Status", "Target"], rows)
    );
    Ok(())
}
