// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! prodq - offline-first capture of production entries.
//!
//! This crate provides the functionality behind the `prodq` CLI: entries
//! are submitted to the production API directly, and queued in a local
//! SQLite database when the API cannot be reached.
//!
//! # Main Components
//!
//! - [`sync`] - Offline queue, submitter, connectivity monitor, and sync passes
//! - [`Config`] - Client configuration (API URL, credentials, timings)
//! - [`Error`] - Error types for all commands
//!
//! # Embedding
//!
//! ```rust,ignore
//! use prodq::sync::{EntryCapture, HttpSubmitter, QueueStore, SharedQueue, SqliteMedium};
//!
//! let queue = SharedQueue::new(QueueStore::open(SqliteMedium::open(&path)?)?)?;
//! let submitter = Arc::new(HttpSubmitter::new(api_url, timeout, auth)?);
//! let outcome = EntryCapture::new(queue, submitter).capture(entry).await?;
//! ```

mod cli;
mod commands;
mod logging;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, EntryArgs, OutputFormat, QueueCommand};
pub use config::{resolve_state_dir, Config};
pub use error::{Error, Result};

use commands::Context;

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process
/// execution.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = resolve_state_dir(cli.state_dir.as_deref());
    let default_level = if cli.command.is_long_running() { "info" } else { "warn" };
    logging::init(&config::log_path(&state_dir), default_level);

    let ctx = || Context::load(state_dir.clone());
    match cli.command {
        Command::Init { api_url } => commands::init::run(&state_dir, api_url),
        Command::Login { username, password } => commands::login::run(&ctx()?, &username, password),
        Command::Submit { entry, output } => commands::submit::run(&ctx()?, entry, output),
        Command::Queue(cmd) => commands::queue::run(&ctx()?, cmd),
        Command::Sync { output } => commands::sync::run(&ctx()?, output),
        Command::Watch => commands::watch::run(&ctx()?),
        Command::Status { output } => commands::status::run(&ctx()?, output),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
