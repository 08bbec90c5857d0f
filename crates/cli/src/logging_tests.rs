// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_filter_uses_directives_when_valid() {
    assert_eq!(filter(Some("prodq=debug"), "warn").to_string(), "prodq=debug");
}

#[test]
fn test_filter_falls_back_to_default() {
    assert_eq!(filter(None, "info").to_string(), "info");
    assert_eq!(filter(Some("prodq=loudest"), "warn").to_string(), "warn");
}

#[test]
fn test_init_creates_log_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("logs").join("prodq.log");
    init(&path, "warn");
    assert!(path.exists());
}
