// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

#[test]
fn sync_while_unreachable_keeps_queue() {
    let state = init_offline();
    let id = queue_entry(&state, "M-001", "50");

    prodq(&state)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Offline"));

    prodq(&state)
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(id.as_str()));
}

#[test]
fn sync_json_reports_outcome() {
    let state = init_offline();

    let output = prodq(&state).args(["sync", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcome"], "offline");
}

#[test]
fn status_reports_pending_count() {
    let state = init_offline();
    queue_entry(&state, "M-001", "1");
    queue_entry(&state, "M-002", "2");

    prodq(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Connectivity: offline"))
        .stdout(predicate::str::contains("Pending:      2"));
}

#[test]
fn api_url_env_override_applies() {
    let state = init_offline();

    let output = prodq(&state)
        .env("PRODQ_API_URL", "http://127.0.0.1:10")
        .args(["status", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["api_url"], "http://127.0.0.1:10");
    assert_eq!(json["target"], "127.0.0.1:10");
}
