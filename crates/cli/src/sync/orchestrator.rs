// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Draining the offline queue against the submitter.
//!
//! A sync pass snapshots the queue, submits entries oldest first, and is the
//! single place where submission errors turn into retry-or-give-up
//! decisions:
//!
//! | Outcome       | Entry          | Pass            |
//! |---------------|----------------|-----------------|
//! | success       | removed        | continues       |
//! | rejected      | removed        | continues       |
//! | unreachable   | stays queued   | stops           |
//! | no credential | stays queued   | stops           |

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pt_core::{LocalId, ProductionEntry};
use serde::Serialize;

use super::medium::KvMedium;
use super::monitor::ConnectivityState;
use super::queue::{QueueResult, SharedQueue};
use super::submitter::{SubmitError, Submitter};

/// An entry the server refused. Removed from the queue; needs correction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEntry {
    pub local_id: LocalId,
    pub status: u16,
    pub detail: String,
    pub payload: ProductionEntry,
}

/// Why a pass stopped before the end of its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The server could not be reached; the rest would fail the same way.
    Unreachable,
    /// No credential was available.
    Unauthenticated,
}

/// Result of one sync pass. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    /// Submitted and removed.
    pub succeeded: Vec<LocalId>,
    /// Attempted but still failing; left queued.
    pub failed: Vec<LocalId>,
    /// Refused by the server and removed.
    pub rejected: Vec<RejectedEntry>,
    /// Not attempted because the pass stopped early; left queued.
    pub deferred: Vec<LocalId>,
    /// The snapshot was empty, as opposed to everything failing.
    pub queue_was_empty: bool,
    pub aborted: Option<AbortReason>,
}

impl SyncSummary {
    /// Entries still queued after this pass.
    pub fn remaining(&self) -> usize {
        self.failed.len() + self.deferred.len()
    }

    /// Entries the pass took from the queue snapshot.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.rejected.len() + self.remaining()
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.queue_was_empty {
            return write!(f, "Nothing to sync: the offline queue is empty.");
        }

        write!(f, "Synced {} of {} queued entries.", self.succeeded.len(), self.total())?;

        if !self.rejected.is_empty() {
            write!(
                f,
                "\n{} rejected by the server and removed from the queue; correct and resubmit:",
                self.rejected.len()
            )?;
            for r in &self.rejected {
                write!(
                    f,
                    "\n  {} ({} {}, {} on {}): HTTP {}: {}",
                    r.local_id,
                    r.payload.machine_id,
                    r.payload.shift,
                    r.payload.product_name,
                    r.payload.production_date,
                    r.status,
                    r.detail
                )?;
            }
        }

        let remaining = self.remaining();
        if remaining > 0 {
            let why = match self.aborted {
                Some(AbortReason::Unauthenticated) => "not authenticated",
                _ => "server unreachable",
            };
            write!(f, "\n{} still queued ({}); will retry on the next pass.", remaining, why)?;
        }

        Ok(())
    }
}

/// What happened when a pass was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PassOutcome {
    /// The pass ran to completion or stopped early; see the summary.
    Completed(SyncSummary),
    /// Another pass was in flight; this trigger was ignored.
    AlreadyRunning,
    /// Offline when the pass was requested; nothing was attempted.
    Offline,
}

impl fmt::Display for PassOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassOutcome::Completed(summary) => write!(f, "{}", summary),
            PassOutcome::AlreadyRunning => write!(f, "A sync pass is already running."),
            PassOutcome::Offline => write!(f, "Offline: sync deferred until connectivity returns."),
        }
    }
}

/// Clears the busy flag when a pass ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs sync passes, at most one at a time.
pub struct SyncOrchestrator<M: KvMedium, S: Submitter> {
    queue: SharedQueue<M>,
    submitter: Arc<S>,
    connectivity: ConnectivityState,
    busy: AtomicBool,
}

impl<M: KvMedium, S: Submitter> SyncOrchestrator<M, S> {
    pub fn new(queue: SharedQueue<M>, submitter: Arc<S>, connectivity: ConnectivityState) -> Self {
        SyncOrchestrator { queue, submitter, connectivity, busy: AtomicBool::new(false) }
    }

    /// Check if a pass is in flight.
    pub fn is_running(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn queue(&self) -> &SharedQueue<M> {
        &self.queue
    }

    /// Drain the queue once.
    ///
    /// Entries added after the snapshot wait for the next pass, and entries
    /// already flagged synced are skipped. Storage failures stop the pass and
    /// propagate.
    pub async fn sync_pass(&self) -> QueueResult<PassOutcome> {
        if !self.connectivity.is_online() {
            tracing::debug!("offline; sync pass not started");
            return Ok(PassOutcome::Offline);
        }

        // Claimed before the first await so a re-entrant trigger sees it
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("sync pass already running; trigger ignored");
            return Ok(PassOutcome::AlreadyRunning);
        }
        let _guard = BusyGuard(&self.busy);

        // Synced entries are kept only until removal and are never resubmitted
        let snapshot: Vec<_> = self.queue.list_all()?.into_iter().filter(|e| !e.synced).collect();
        let mut summary = SyncSummary::default();

        if snapshot.is_empty() {
            summary.queue_was_empty = true;
            tracing::debug!("sync pass: queue empty");
            return Ok(PassOutcome::Completed(summary));
        }

        tracing::info!("sync pass started with {} queued entries", snapshot.len());

        let mut pending = snapshot.into_iter();
        for entry in pending.by_ref() {
            match self.submitter.submit(&entry.payload).await {
                Ok(record) => {
                    self.queue.remove(&entry.local_id)?;
                    tracing::debug!(
                        local_id = %entry.local_id,
                        server_id = record.id.as_deref().unwrap_or("-"),
                        "queued entry submitted"
                    );
                    summary.succeeded.push(entry.local_id);
                }
                Err(SubmitError::Rejected { status, detail }) => {
                    tracing::warn!(local_id = %entry.local_id, status, "queued entry rejected: {}", detail);
                    self.queue.remove(&entry.local_id)?;
                    summary.rejected.push(RejectedEntry {
                        local_id: entry.local_id,
                        status,
                        detail,
                        payload: entry.payload,
                    });
                }
                Err(SubmitError::Unreachable(reason)) => {
                    tracing::warn!(local_id = %entry.local_id, "server unreachable, stopping pass: {}", reason);
                    summary.failed.push(entry.local_id);
                    summary.aborted = Some(AbortReason::Unreachable);
                    break;
                }
                Err(SubmitError::Unauthenticated) => {
                    tracing::warn!("no credential available, stopping pass");
                    summary.deferred.push(entry.local_id);
                    summary.aborted = Some(AbortReason::Unauthenticated);
                    break;
                }
            }
        }
        summary.deferred.extend(pending.map(|e| e.local_id));

        tracing::info!(
            succeeded = summary.succeeded.len(),
            rejected = summary.rejected.len(),
            remaining = summary.remaining(),
            "sync pass finished"
        );
        Ok(PassOutcome::Completed(summary))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
