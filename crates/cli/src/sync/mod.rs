// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first submission of production entries.
//!
//! An entry is submitted directly. If the server cannot be reached it is
//! persisted locally and submitted later by a sync pass, which runs when
//! connectivity settles back online or when requested.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Capture    │────►│  Submitter  │────►│   Remote    │
//! │(EntryCapture)     │   (trait)   │◄────│  /production│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │ unreachable       ▲
//!        ▼                   │
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Queue     │◄────│Orchestrator │◄────│   Agent     │
//! │(SharedQueue)│     │ (sync pass) │     │(auto-sync)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       ▲
//!        ▼                                       │
//! ┌─────────────┐                         ┌─────────────┐
//! │   Medium    │                         │  Monitor    │
//! │  (SQLite)   │                         │(transitions)│
//! └─────────────┘                         └─────────────┘
//! ```
//!
//! # Features
//!
//! - Durable queue keyed by time-ordered local ids
//! - At most one sync pass in flight
//! - Rejected entries removed and reported, never retried
//! - Reconnects debounced before a pass is triggered
//! - Password login that stores a bearer token for later passes
//! - Injectable medium, submitter, and signal traits for testing

mod agent;
mod auth;
mod capture;
mod login;
mod medium;
mod monitor;
mod orchestrator;
mod queue;
mod submitter;

pub use agent::{spawn_auto_sync, OutcomeSender};
pub use auth::{AuthProvider, NoAuth, StaticToken, TokenFile};
pub use capture::{CaptureError, CaptureOutcome, EntryCapture};
pub use login::{store_token, token_endpoint, IssuedToken, LoginError, TokenClient};
pub use medium::{KvMedium, MediumError, MediumResult, SqliteMedium};
pub use monitor::{
    ChannelSignal, Connectivity, ConnectivityMonitor, ConnectivitySignal, ConnectivityState,
    ProbeError, ProbeSignal, Transition,
};
pub use orchestrator::{AbortReason, PassOutcome, RejectedEntry, SyncOrchestrator, SyncSummary};
pub use queue::{QueueResult, QueueStore, QueuedEntry, SharedQueue, StorageFailure};
pub use submitter::{
    production_endpoint, rejection_detail, HttpSubmitter, SubmitError, SubmitFuture,
    SubmitResult, Submitter,
};

#[cfg(test)]
pub(crate) mod test_helpers;
