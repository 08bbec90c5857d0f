// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use chrono::Local;
use pt_core::{LocalId, ProductionEntry};
use serde::Serialize;

use crate::cli::{EntryArgs, OutputFormat};
use crate::error::Result;
use crate::sync::{CaptureOutcome, EntryCapture, KvMedium, Submitter};

use super::{print_json, runtime, Context};

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum SubmitJson<'a> {
    Submitted {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<&'a str>,
        record: &'a serde_json::Value,
    },
    Queued {
        #[serde(rename = "localId")]
        local_id: &'a LocalId,
        reason: &'a str,
    },
}

pub fn run(ctx: &Context, args: EntryArgs, output: OutputFormat) -> Result<()> {
    let entry = args.into_entry(Local::now().date_naive());
    let capture = EntryCapture::new(ctx.open_queue()?, Arc::new(ctx.submitter()?));
    let outcome = runtime()?.block_on(run_impl(&capture, entry))?;

    match output {
        OutputFormat::Text => println!("{}", describe(&outcome)),
        OutputFormat::Json => print_json(&to_json(&outcome))?,
    }
    Ok(())
}

pub(crate) async fn run_impl<M: KvMedium, S: Submitter>(
    capture: &EntryCapture<M, S>,
    entry: ProductionEntry,
) -> Result<CaptureOutcome> {
    tracing::debug!(machine = %entry.machine_id, "capturing entry");
    Ok(capture.capture(entry).await?)
}

fn to_json(outcome: &CaptureOutcome) -> SubmitJson<'_> {
    match outcome {
        CaptureOutcome::Submitted(record) => {
            SubmitJson::Submitted { id: record.id.as_deref(), record: &record.body }
        }
        CaptureOutcome::Queued { entry, reason } => {
            SubmitJson::Queued { local_id: &entry.local_id, reason }
        }
    }
}

pub(crate) fn describe(outcome: &CaptureOutcome) -> String {
    match outcome {
        CaptureOutcome::Submitted(record) => match &record.id {
            Some(id) => format!("Submitted (server id {}).", id),
            None => "Submitted.".to_string(),
        },
        CaptureOutcome::Queued { entry, reason } => format!(
            "Server unreachable ({}).\nSaved offline as {}; it will be submitted on the next sync.",
            reason, entry.local_id
        ),
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
