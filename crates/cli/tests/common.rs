// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Port 9 (discard) is closed on test hosts, so connections are refused.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9";

/// `prodq` bound to `state`, with env overrides cleared.
pub fn prodq(state: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("prodq");
    cmd.env("PRODQ_STATE_DIR", state.path())
        .env_remove("PRODQ_API_URL")
        .env_remove("PRODQ_TOKEN")
        .env_remove("PRODQ_PASSWORD")
        .env_remove("PRODQ_LOG");
    cmd
}

/// A state directory initialized against an unreachable API.
pub fn init_offline() -> TempDir {
    let state = TempDir::new().unwrap();
    prodq(&state).args(["init", "--api-url", UNREACHABLE_API]).assert().success();
    state
}

/// Submit an entry that will be queued; returns its local id.
pub fn queue_entry(state: &TempDir, machine: &str, quantity: &str) -> String {
    let output = prodq(state)
        .args(["submit", "-m", machine, "-p", "Widget A", "-q", quantity, "-s", "morning"])
        .args(["--date", "2024-06-25", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["localId"].as_str().unwrap().to_string()
}
