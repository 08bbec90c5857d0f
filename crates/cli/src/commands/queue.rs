// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use pt_core::LocalId;

use crate::cli::{OutputFormat, QueueCommand};
use crate::error::{Error, Result};
use crate::sync::{KvMedium, QueuedEntry, SharedQueue};

use super::{print_json, Context};

pub fn run(ctx: &Context, command: QueueCommand) -> Result<()> {
    let queue = ctx.open_queue()?;
    match command {
        QueueCommand::List { output } => list(&queue, output),
        QueueCommand::Show { id, output } => show(&queue, &id, output),
        QueueCommand::Discard { ids } => {
            for id in discard(&queue, &ids)? {
                println!("Discarded {}", id);
            }
            Ok(())
        }
    }
}

fn list<M: KvMedium>(queue: &SharedQueue<M>, output: OutputFormat) -> Result<()> {
    let entries = queue.list_all()?;
    match output {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Text if entries.is_empty() => println!("Offline queue is empty."),
        OutputFormat::Text => {
            for entry in &entries {
                println!("{}", format_line(entry));
            }
            println!("{} pending", entries.len());
        }
    }
    Ok(())
}

fn show<M: KvMedium>(queue: &SharedQueue<M>, id: &str, output: OutputFormat) -> Result<()> {
    let entry = find(queue, id)?;
    match output {
        OutputFormat::Json => print_json(&entry)?,
        OutputFormat::Text => println!("{}", format_detail(&entry)),
    }
    Ok(())
}

pub(crate) fn find<M: KvMedium>(queue: &SharedQueue<M>, id: &str) -> Result<QueuedEntry> {
    let local_id = LocalId::parse(id.trim())?;
    queue.get(&local_id)?.ok_or_else(|| Error::EntryNotFound(id.to_string()))
}

/// Remove the given entries. Every id is checked before anything is removed.
///
/// Entries are matched by key only, so a corrupt entry can still be discarded.
pub(crate) fn discard<M: KvMedium>(queue: &SharedQueue<M>, ids: &[String]) -> Result<Vec<LocalId>> {
    let mut local_ids = Vec::with_capacity(ids.len());
    for id in ids {
        let local_id = LocalId::parse(id.trim())?;
        if !queue.contains(&local_id)? {
            return Err(Error::EntryNotFound(id.to_string()));
        }
        local_ids.push(local_id);
    }

    for local_id in &local_ids {
        queue.remove(local_id)?;
        tracing::info!(%local_id, "queued entry discarded");
    }
    Ok(local_ids)
}

pub(crate) fn format_line(entry: &QueuedEntry) -> String {
    let p = &entry.payload;
    format!(
        "{}  {} {:<9} {:<10} {} x{}",
        entry.local_id,
        p.production_date,
        p.shift.as_str(),
        p.machine_id,
        p.product_name,
        p.quantity_produced
    )
}

pub(crate) fn format_detail(entry: &QueuedEntry) -> String {
    let p = &entry.payload;
    let mut out = format!(
        "Local id: {}\nDate:     {}\nShift:    {}\nMachine:  {}\nProduct:  {}\nQuantity: {}",
        entry.local_id, p.production_date, p.shift, p.machine_id, p.product_name, p.quantity_produced
    );
    if let Some(operator) = &p.operator_id {
        out.push_str(&format!("\nOperator: {}", operator));
    }
    if let Some(minutes) = p.time_taken_minutes {
        out.push_str(&format!("\nMinutes:  {}", minutes));
    }
    if let Some(remarks) = &p.remarks {
        out.push_str(&format!("\nRemarks:  {}", remarks));
    }
    out
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
