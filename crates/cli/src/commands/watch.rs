// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running auto-sync.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::config::watch_lock_path;
use crate::error::{Error, Result};
use crate::sync::{
    spawn_auto_sync, ConnectivityMonitor, PassOutcome, QueueResult, SyncOrchestrator, Transition,
};

use super::{runtime, Context};

pub fn run(ctx: &Context) -> Result<()> {
    let _lock = acquire_lock(&ctx.state_dir)?;
    let queue = ctx.open_queue()?;
    let submitter = Arc::new(ctx.submitter()?);
    let mut probe = ctx.probe()?;
    let settle = ctx.config.settle_delay();

    runtime()?.block_on(async move {
        let monitor = Arc::new(ConnectivityMonitor::from_signal(&mut probe, settle).await);
        let orchestrator = Arc::new(SyncOrchestrator::new(queue, submitter, monitor.state()));
        let cancel = CancellationToken::new();
        let (outcome_tx, mut outcome_rx) = mpsc::channel(16);

        println!(
            "Watching {} ({}); {} pending. Press Ctrl-C to stop.",
            probe.target(),
            monitor.state().current(),
            orchestrator.queue().pending().len()
        );

        let events = monitor.subscribe();
        let agent = spawn_auto_sync(
            Arc::clone(&orchestrator),
            monitor.subscribe(),
            outcome_tx,
            monitor.is_online(),
            cancel.clone(),
        );
        let monitor_task = Arc::clone(&monitor).spawn(probe, cancel.clone());

        report_until_interrupted(events, &mut outcome_rx).await;

        tracing::info!("watch stopping");
        cancel.cancel();
        // Closes once the agent and every pass it started are done
        while let Some(outcome) = outcome_rx.recv().await {
            report(outcome);
        }
        let _ = agent.await;
        let _ = monitor_task.await;
    });

    Ok(())
}

async fn report_until_interrupted(
    mut events: broadcast::Receiver<Transition>,
    outcomes: &mut mpsc::Receiver<QueueResult<PassOutcome>>,
) {
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(outcome) = outcomes.recv() => report(outcome),
            Ok(event) = events.recv() => match event {
                Transition::Online => println!("Back online."),
                Transition::Offline => println!("Offline; new entries will be queued."),
            },
        }
    }
}

fn report(outcome: QueueResult<PassOutcome>) {
    match outcome {
        Ok(PassOutcome::Completed(summary)) if summary.queue_was_empty => {}
        Ok(outcome) => println!("{}", outcome),
        Err(e) => eprintln!("error: sync pass failed: {}", e),
    }
}

/// Take the per-state-dir watcher lock. Held until the file is dropped.
pub(crate) fn acquire_lock(state_dir: &Path) -> Result<fs::File> {
    use fs2::FileExt;

    fs::create_dir_all(state_dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(watch_lock_path(state_dir))?;
    file.try_lock_exclusive()
        .map_err(|_| Error::WatchRunning(state_dir.to_path_buf()))?;
    Ok(file)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
