// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use chrono::NaiveDate;
use pt_core::Shift;
use yare::parameterized;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

fn submit_args(args: &[&str]) -> EntryArgs {
    let mut full = vec!["prodq", "submit"];
    full.extend_from_slice(args);
    match parse(&full).unwrap().command {
        Command::Submit { entry, .. } => entry,
        other => unreachable!("parsed as {:?}", other),
    }
}

#[test]
fn test_submit_required_fields() {
    let entry = submit_args(&["-m", "M-001", "-p", "Widget A", "-q", "50", "-s", "morning"]);
    assert_eq!(entry.machine_id, "M-001");
    assert_eq!(entry.product_name, "Widget A");
    assert_eq!(entry.quantity, 50);
    assert_eq!(entry.shift, Shift::Morning);
    assert_eq!(entry.date, None);
}

#[test]
fn test_submit_accepts_negative_quantity() {
    let entry = submit_args(&["-m", "M-001", "-p", "W", "-q", "-5", "-s", "Night"]);
    assert_eq!(entry.quantity, -5);
    assert_eq!(entry.shift, Shift::Night);
}

#[test]
fn test_submit_optional_fields() {
    let entry = submit_args(&[
        "--machine", "M-002", "--product", "Bolt", "--quantity", "7", "--shift", "afternoon",
        "--date", "2024-06-24", "--remarks", "late start", "--operator", "op-9", "--minutes", "45",
    ]);
    let built = entry.into_entry(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
    assert_eq!(built.production_date, NaiveDate::from_ymd_opt(2024, 6, 24).unwrap());
    assert_eq!(built.remarks.as_deref(), Some("late start"));
    assert_eq!(built.operator_id.as_deref(), Some("op-9"));
    assert_eq!(built.time_taken_minutes, Some(45));
}

#[test]
fn test_submit_date_defaults_to_today() {
    let entry = submit_args(&["-m", "M", "-p", "P", "-q", "1", "-s", "morning"]);
    let today = NaiveDate::from_ymd_opt(2024, 6, 25).unwrap();
    assert_eq!(entry.into_entry(today).production_date, today);
}

#[parameterized(
    bad_shift = { &["prodq", "submit", "-m", "M", "-p", "P", "-q", "1", "-s", "dawn"] },
    bad_date = { &["prodq", "submit", "-m", "M", "-p", "P", "-q", "1", "-s", "night", "--date", "25/06/2024"] },
    missing_machine = { &["prodq", "submit", "-p", "P", "-q", "1", "-s", "night"] },
    non_numeric_quantity = { &["prodq", "submit", "-m", "M", "-p", "P", "-q", "many", "-s", "night"] },
    discard_without_ids = { &["prodq", "queue", "discard"] },
    login_without_username = { &["prodq", "login"] },
)]
fn test_invalid_args_rejected(args: &[&str]) {
    assert!(parse(args).is_err());
}

#[test]
fn test_queue_discard_multiple_ids() {
    let cli = parse(&["prodq", "queue", "discard", "a", "b"]).unwrap();
    match cli.command {
        Command::Queue(QueueCommand::Discard { ids }) => assert_eq!(ids, vec!["a", "b"]),
        other => unreachable!("parsed as {:?}", other),
    }
}

#[parameterized(
    default_text = { &["prodq", "queue", "list"], OutputFormat::Text },
    json = { &["prodq", "queue", "list", "-o", "json"], OutputFormat::Json },
)]
fn test_queue_list_output(args: &[&str], expected: OutputFormat) {
    match parse(args).unwrap().command {
        Command::Queue(QueueCommand::List { output }) => assert_eq!(output, expected),
        other => unreachable!("parsed as {:?}", other),
    }
}

#[test]
fn test_state_dir_is_global() {
    let cli = parse(&["prodq", "sync", "--state-dir", "/tmp/s"]).unwrap();
    assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/s")));
    assert!(matches!(cli.command, Command::Sync { output: OutputFormat::Text }));
}

#[test]
fn test_only_watch_is_long_running() {
    assert!(parse(&["prodq", "watch"]).unwrap().command.is_long_running());
    assert!(!parse(&["prodq", "status"]).unwrap().command.is_long_running());
}

#[parameterized(
    short_username = { &["prodq", "login", "-u", "op1"], None },
    with_password = { &["prodq", "login", "--username", "op1", "--password", "pw"], Some("pw") },
)]
fn test_login_args(args: &[&str], expected_password: Option<&str>) {
    match parse(args).unwrap().command {
        Command::Login { username, password } => {
            assert_eq!(username, "op1");
            assert_eq!(password.as_deref(), expected_password);
        }
        other => unreachable!("parsed as {:?}", other),
    }
}
