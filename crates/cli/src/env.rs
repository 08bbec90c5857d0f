// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! The variable name constants are generated by `build.rs` and live in the
//! [`vars`] submodule. Empty values are treated as unset.

use std::path::PathBuf;

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns the value of `PRODQ_STATE_DIR` if set.
pub fn state_dir() -> Option<PathBuf> {
    non_empty(vars::PRODQ_STATE_DIR).map(PathBuf::from)
}

/// Returns the value of `XDG_STATE_HOME` if set.
pub fn xdg_state_home() -> Option<PathBuf> {
    non_empty(vars::XDG_STATE_HOME).map(PathBuf::from)
}

/// API base URL override.
pub fn api_url() -> Option<String> {
    non_empty(vars::PRODQ_API_URL)
}

/// Bearer token override.
pub fn token() -> Option<String> {
    non_empty(vars::PRODQ_TOKEN)
}

/// Password for `prodq login`, so it need not appear on the command line.
pub fn password() -> Option<String> {
    std::env::var(vars::PRODQ_PASSWORD).ok().filter(|v| !v.is_empty())
}

/// Log filter directives, e.g. `prodq=debug`.
pub fn log_filter() -> Option<String> {
    non_empty(vars::PRODQ_LOG)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
