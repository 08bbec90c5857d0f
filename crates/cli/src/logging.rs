// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Log setup for `prodq` processes.
//!
//! Logs go to `<state_dir>/prodq.log` so they never interleave with command
//! output. If the file cannot be opened they fall back to stderr.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::env;

/// Install the global subscriber.
///
/// `PRODQ_LOG` overrides `default_directive`. Installing twice is a no-op.
pub fn init(log_path: &Path, default_directive: &str) {
    let filter = filter(env::log_filter().as_deref(), default_directive);

    if let Some(parent) = log_path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let file = fs::OpenOptions::new().create(true).append(true).open(log_path);
    let installed = match file {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        Err(_) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("log subscriber already installed");
    }
}

fn filter(directives: Option<&str>, default_directive: &str) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
