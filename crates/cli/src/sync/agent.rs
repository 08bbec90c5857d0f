// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Automatic sync: a pass for every settled reconnect.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::medium::KvMedium;
use super::monitor::Transition;
use super::orchestrator::{PassOutcome, SyncOrchestrator};
use super::queue::QueueResult;
use super::submitter::Submitter;

/// Sender for pass results produced by the agent.
pub type OutcomeSender = mpsc::Sender<QueueResult<PassOutcome>>;

/// Run a sync pass whenever `transitions` reports `Online`.
///
/// Passes are spawned, so a trigger arriving while one is in flight sees
/// `AlreadyRunning` rather than waiting. With `initial_pass` set, one pass
/// is attempted immediately. The agent stops when `cancel` fires or the
/// transition channel closes, and its handle resolves only after every pass
/// it started has finished and delivered its outcome.
pub fn spawn_auto_sync<M, S>(
    orchestrator: Arc<SyncOrchestrator<M, S>>,
    mut transitions: broadcast::Receiver<Transition>,
    outcomes: OutcomeSender,
    initial_pass: bool,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    M: KvMedium + 'static,
    S: Submitter + 'static,
{
    tokio::spawn(async move {
        let passes = TaskTracker::new();
        if initial_pass {
            spawn_pass(&passes, &orchestrator, &outcomes);
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                event = transitions.recv() => match event {
                    Ok(Transition::Online) => spawn_pass(&passes, &orchestrator, &outcomes),
                    Ok(Transition::Offline) => tracing::debug!("offline; waiting for reconnect"),
                    // Missed events may have included a reconnect
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!("missed {} connectivity events", n);
                        spawn_pass(&passes, &orchestrator, &outcomes);
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        // In-flight passes run to completion before the agent returns
        passes.close();
        if !passes.is_empty() {
            tracing::info!("waiting for {} sync pass(es) to finish", passes.len());
        }
        passes.wait().await;
        tracing::debug!("auto-sync stopped");
    })
}

fn spawn_pass<M, S>(
    passes: &TaskTracker,
    orchestrator: &Arc<SyncOrchestrator<M, S>>,
    outcomes: &OutcomeSender,
) where
    M: KvMedium + 'static,
    S: Submitter + 'static,
{
    let orchestrator = Arc::clone(orchestrator);
    let outcomes = outcomes.clone();
    passes.spawn(async move {
        let outcome = orchestrator.sync_pass().await;
        if let Err(e) = &outcome {
            tracing::error!("sync pass failed: {}", e);
        }
        // Receiver gone means nobody is listening; the pass still ran
        let _ = outcomes.send(outcome).await;
    });
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
