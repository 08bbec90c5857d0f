// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

use crate::sync::{CaptureError, LoginError, MediumError, ProbeError, StorageFailure};

/// All errors surfaced by the `prodq` commands.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("already initialized at {0}\n  hint: edit the file directly to change settings")]
    AlreadyInitialized(String),

    #[error("queued entry not found: {0}\n  hint: run 'prodq queue list' to see pending entries")]
    EntryNotFound(String),

    #[error("another 'prodq watch' is already running for {}", .0.display())]
    WatchRunning(PathBuf),

    #[error("no password given\n  hint: set PRODQ_PASSWORD or pipe the password on stdin")]
    PasswordRequired,

    #[error("{0}\n  hint: check the username and password, or 'api_url' in config.toml")]
    Login(#[from] LoginError),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Core(#[from] pt_core::Error),

    #[error("offline queue error: {0}")]
    Storage(#[from] StorageFailure),

    #[error("cannot open offline queue: {0}")]
    Medium(#[from] MediumError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}\n  hint: check 'api_url' in config.toml or PRODQ_API_URL")]
    Probe(#[from] ProbeError),

    #[error("failed to start async runtime: {0}")]
    Runtime(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for prodq operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
