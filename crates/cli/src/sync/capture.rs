// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capturing a new entry: submit now, fall back to the offline queue.

use std::sync::Arc;

use pt_core::{ProductionEntry, RemoteRecord};

use super::medium::KvMedium;
use super::queue::{QueuedEntry, SharedQueue, StorageFailure};
use super::submitter::{SubmitError, Submitter};

/// Where a captured entry ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Accepted by the server.
    Submitted(RemoteRecord),
    /// Persisted locally for a later sync pass.
    Queued {
        entry: QueuedEntry,
        /// Why the direct submission did not go through.
        reason: String,
    },
}

/// A capture the operator has to act on. Nothing was queued.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The server refused the entry; correct it and capture again.
    #[error("entry rejected by server (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("not authenticated\n  hint: set 'token' or 'token_file' in config.toml, or PRODQ_TOKEN")]
    Unauthenticated,

    /// The server was unreachable and the entry could not be saved either.
    #[error("server unreachable and the entry could not be queued: {0}")]
    Storage(#[from] StorageFailure),
}

/// Direct submission with queue fallback.
pub struct EntryCapture<M: KvMedium, S: Submitter> {
    queue: SharedQueue<M>,
    submitter: Arc<S>,
}

impl<M: KvMedium, S: Submitter> EntryCapture<M, S> {
    pub fn new(queue: SharedQueue<M>, submitter: Arc<S>) -> Self {
        EntryCapture { queue, submitter }
    }

    /// Submit `entry`, queuing it only when the server cannot be reached.
    pub async fn capture(&self, entry: ProductionEntry) -> Result<CaptureOutcome, CaptureError> {
        match self.submitter.submit(&entry).await {
            Ok(record) => Ok(CaptureOutcome::Submitted(record)),
            Err(SubmitError::Unreachable(reason)) => {
                let queued = self.queue.save(entry)?;
                tracing::info!(local_id = %queued.local_id, "server unreachable, entry queued: {}", reason);
                Ok(CaptureOutcome::Queued { entry: queued, reason })
            }
            Err(SubmitError::Rejected { status, detail }) => {
                Err(CaptureError::Rejected { status, detail })
            }
            Err(SubmitError::Unauthenticated) => Err(CaptureError::Unauthenticated),
        }
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
