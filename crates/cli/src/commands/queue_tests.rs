// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::{entry, TestContext};
use crate::config::queue_path;
use crate::sync::{SqliteMedium, StorageFailure};

#[test]
fn test_find_existing_entry() {
    let tc = TestContext::new();
    let queue = tc.queue();
    let saved = queue.save(entry("M-001", 5)).unwrap();

    let found = find(&queue, saved.local_id.as_str()).unwrap();
    assert_eq!(found, saved);
}

#[test]
fn test_find_unknown_entry() {
    let tc = TestContext::new();
    let queue = tc.queue();
    let missing = LocalId::from_parts(1_718_000_000_000, 7);

    let err = find(&queue, missing.as_str()).unwrap_err();
    assert!(matches!(err, Error::EntryNotFound(_)));
}

#[test]
fn test_find_malformed_id() {
    let tc = TestContext::new();
    let err = find(&tc.queue(), "not-an-id").unwrap_err();
    assert!(matches!(err, Error::Core(_)));
}

#[test]
fn test_discard_removes_entries() {
    let tc = TestContext::new();
    let queue = tc.queue();
    let a = queue.save(entry("A", 1)).unwrap();
    let b = queue.save(entry("B", 2)).unwrap();
    let c = queue.save(entry("C", 3)).unwrap();

    let removed = discard(&queue, &[a.local_id.to_string(), c.local_id.to_string()]).unwrap();

    assert_eq!(removed, vec![a.local_id, c.local_id]);
    assert_eq!(queue.pending(), vec![b.local_id]);
}

#[test]
fn test_discard_with_unknown_id_removes_nothing() {
    let tc = TestContext::new();
    let queue = tc.queue();
    let a = queue.save(entry("A", 1)).unwrap();
    let missing = LocalId::from_parts(1, 1);

    let err = discard(&queue, &[a.local_id.to_string(), missing.to_string()]).unwrap_err();

    assert!(matches!(err, Error::EntryNotFound(_)));
    assert_eq!(queue.len().unwrap(), 1);
}

#[test]
fn test_discard_corrupt_entry_by_key() {
    let tc = TestContext::new();
    let good = tc.queue().save(entry("M-001", 5)).unwrap();
    let mut medium = SqliteMedium::open(&queue_path(tc.dir.path())).unwrap();
    medium.set("0000000000001-00000001", "{not json").unwrap();

    let queue = tc.queue();
    assert!(matches!(queue.list_all(), Err(StorageFailure::Corrupt { .. })));

    let removed = discard(&queue, &["0000000000001-00000001".to_string()]).unwrap();

    assert_eq!(removed, vec![LocalId::from_parts(1, 1)]);
    assert_eq!(queue.list_all().unwrap(), vec![good]);
}

#[test]
fn test_format_line() {
    let queued = QueuedEntry {
        local_id: LocalId::from_parts(1_718_000_000_000, 1),
        payload: entry("M-001", 50),
        synced: false,
    };
    let line = format_line(&queued);
    assert!(line.starts_with(queued.local_id.as_str()));
    assert!(line.contains("2024-06-25"));
    assert!(line.contains("Morning"));
    assert!(line.ends_with("Widget A x50"));
}

#[test]
fn test_format_detail_includes_optional_fields() {
    let queued = QueuedEntry {
        local_id: LocalId::from_parts(1_718_000_000_000, 1),
        payload: entry("M-001", 50).with_remarks("jam at 10:00").with_time_taken(90),
        synced: false,
    };
    let detail = format_detail(&queued);
    assert!(detail.contains("Remarks:  jam at 10:00"));
    assert!(detail.contains("Minutes:  90"));
    assert!(!detail.contains("Operator"));
}
