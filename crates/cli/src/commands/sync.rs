// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{
    Connectivity, ConnectivityState, KvMedium, PassOutcome, SharedQueue, Submitter,
    SyncOrchestrator,
};

use super::{print_json, runtime, Context};

pub fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let queue = ctx.open_queue()?;
    let submitter = Arc::new(ctx.submitter()?);
    let probe = ctx.probe()?;

    let outcome = runtime()?.block_on(async {
        let connectivity = probe.probe().await;
        tracing::debug!("{} is {}", probe.target(), connectivity);
        run_impl(queue, submitter, connectivity).await
    })?;

    match output {
        OutputFormat::Text => println!("{}", outcome),
        OutputFormat::Json => print_json(&outcome)?,
    }
    Ok(())
}

pub(crate) async fn run_impl<M: KvMedium, S: Submitter>(
    queue: SharedQueue<M>,
    submitter: Arc<S>,
    connectivity: Connectivity,
) -> Result<PassOutcome> {
    let orchestrator = SyncOrchestrator::new(queue, submitter, ConnectivityState::new(connectivity));
    Ok(orchestrator.sync_pass().await?)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
