// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for pt-core operations.

use thiserror::Error;

/// All possible errors that can occur in pt-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid shift: '{0}'\n  hint: valid shifts are: Morning, Afternoon, Night")]
    InvalidShift(String),

    #[error("invalid local id: {0}")]
    InvalidLocalId(String),

    #[error("invalid production date: '{0}'\n  hint: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for pt-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
