// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for command tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use chrono::NaiveDate;
use pt_core::{ProductionEntry, Shift};
use tempfile::TempDir;

/// A temporary state directory with a config pointing at an unused port.
pub struct TestContext {
    pub dir: TempDir,
    pub ctx: Context,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config { api_url: "http://127.0.0.1:9".to_string(), ..Config::default() };
        config.save(dir.path()).unwrap();
        let ctx = Context { state_dir: dir.path().to_path_buf(), config };
        TestContext { dir, ctx }
    }

    pub fn queue(&self) -> SharedQueue<SqliteMedium> {
        self.ctx.open_queue().unwrap()
    }
}

pub fn entry(machine_id: &str, quantity: i64) -> ProductionEntry {
    ProductionEntry::new(
        NaiveDate::from_ymd_opt(2024, 6, 25).unwrap(),
        machine_id,
        Shift::Morning,
        "Widget A",
        quantity,
    )
}

#[test]
fn test_open_queue_creates_database() {
    let tc = TestContext::new();
    let queue = tc.queue();
    assert!(queue.is_empty().unwrap());
    assert!(queue_path(tc.dir.path()).exists());
}

#[test]
fn test_queue_persists_between_opens() {
    let tc = TestContext::new();
    let saved = tc.queue().save(entry("M-001", 5)).unwrap();

    let reopened = tc.queue();
    assert_eq!(reopened.pending(), vec![saved.local_id]);
}

#[test]
fn test_probe_rejects_bad_url() {
    let mut tc = TestContext::new();
    tc.ctx.config.api_url = "not a url".to_string();
    assert!(matches!(tc.ctx.probe(), Err(Error::Probe(_))));
}
