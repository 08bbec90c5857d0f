// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for automatic sync. Time is paused.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::time::Duration;

use super::*;
use crate::sync::monitor::{ChannelSignal, Connectivity, ConnectivityMonitor, ConnectivityState};
use crate::sync::test_helpers::{memory_queue, sample_entry, MemoryMedium, MockSubmitter};

const SETTLE: Duration = Duration::from_secs(2);

type TestOrchestrator = SyncOrchestrator<MemoryMedium, MockSubmitter>;

fn orchestrator(submitter: MockSubmitter, state: ConnectivityState) -> (Arc<TestOrchestrator>, Arc<MockSubmitter>) {
    let (queue, _) = memory_queue();
    let submitter = Arc::new(submitter);
    (Arc::new(SyncOrchestrator::new(queue, Arc::clone(&submitter), state)), submitter)
}

#[tokio::test(start_paused = true)]
async fn reconnect_triggers_exactly_one_pass_after_settle() {
    let (signal, signal_tx) = ChannelSignal::new(Connectivity::Offline);
    let monitor = Arc::new(ConnectivityMonitor::new(Connectivity::Offline, SETTLE));
    let (orch, submitter) = orchestrator(MockSubmitter::new(), monitor.state());
    orch.queue().save(sample_entry("A", 1)).unwrap();
    orch.queue().save(sample_entry("B", 2)).unwrap();

    let cancel = CancellationToken::new();
    let (out_tx, mut out_rx) = mpsc::channel(8);
    spawn_auto_sync(Arc::clone(&orch), monitor.subscribe(), out_tx, false, cancel.clone());
    Arc::clone(&monitor).spawn(signal, cancel.clone());

    signal_tx.send(Connectivity::Online).await.unwrap();
    tokio::time::sleep(SETTLE / 2).await;
    assert_eq!(submitter.attempt_count(), 0);

    let outcome = out_rx.recv().await.unwrap().unwrap();
    let PassOutcome::Completed(summary) = outcome else {
        unreachable!("expected a completed pass");
    };
    assert_eq!(summary.succeeded.len(), 2);
    assert!(orch.queue().is_empty().unwrap());

    tokio::time::sleep(SETTLE * 5).await;
    assert!(out_rx.try_recv().is_err());
    assert_eq!(submitter.attempt_count(), 2);
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn flapping_connection_triggers_no_pass() {
    let (signal, signal_tx) = ChannelSignal::new(Connectivity::Offline);
    let monitor = Arc::new(ConnectivityMonitor::new(Connectivity::Offline, SETTLE));
    let (orch, submitter) = orchestrator(MockSubmitter::new(), monitor.state());
    orch.queue().save(sample_entry("A", 1)).unwrap();

    let cancel = CancellationToken::new();
    let (out_tx, mut out_rx) = mpsc::channel(8);
    spawn_auto_sync(Arc::clone(&orch), monitor.subscribe(), out_tx, false, cancel.clone());
    Arc::clone(&monitor).spawn(signal, cancel.clone());

    signal_tx.send(Connectivity::Online).await.unwrap();
    tokio::time::sleep(SETTLE / 4).await;
    signal_tx.send(Connectivity::Offline).await.unwrap();
    tokio::time::sleep(SETTLE * 3).await;

    assert!(out_rx.try_recv().is_err());
    assert_eq!(submitter.attempt_count(), 0);
    assert_eq!(orch.queue().len().unwrap(), 1);
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn trigger_during_pass_reports_already_running() {
    let (submitter, gate) = MockSubmitter::gated();
    let (orch, submitter) = orchestrator(submitter, ConnectivityState::new(Connectivity::Online));
    orch.queue().save(sample_entry("A", 1)).unwrap();

    let cancel = CancellationToken::new();
    let (events, rx) = broadcast::channel(16);
    let (out_tx, mut out_rx) = mpsc::channel(8);
    spawn_auto_sync(Arc::clone(&orch), rx, out_tx, false, cancel.clone());

    events.send(Transition::Online).unwrap();
    while !orch.is_running() {
        tokio::task::yield_now().await;
    }
    events.send(Transition::Online).unwrap();

    assert_eq!(out_rx.recv().await.unwrap().unwrap(), PassOutcome::AlreadyRunning);

    gate.add_permits(1);
    let outcome = out_rx.recv().await.unwrap().unwrap();
    assert!(matches!(outcome, PassOutcome::Completed(ref s) if s.succeeded.len() == 1));
    assert_eq!(submitter.attempt_count(), 1);
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn initial_pass_drains_queue_on_start() {
    let (orch, _) = orchestrator(MockSubmitter::new(), ConnectivityState::new(Connectivity::Online));
    orch.queue().save(sample_entry("A", 1)).unwrap();

    let cancel = CancellationToken::new();
    let (_events, rx) = broadcast::channel(16);
    let (out_tx, mut out_rx) = mpsc::channel(8);
    spawn_auto_sync(Arc::clone(&orch), rx, out_tx, true, cancel.clone());

    let outcome = out_rx.recv().await.unwrap().unwrap();
    assert!(matches!(outcome, PassOutcome::Completed(ref s) if s.succeeded.len() == 1));
    cancel.cancel();
}

#[tokio::test(start_paused = true)]
async fn agent_stops_on_cancel() {
    let (orch, _) = orchestrator(MockSubmitter::new(), ConnectivityState::new(Connectivity::Online));
    let cancel = CancellationToken::new();
    let (_events, rx) = broadcast::channel(16);
    let (out_tx, _out_rx) = mpsc::channel(8);
    let handle = spawn_auto_sync(orch, rx, out_tx, false, cancel.clone());

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn agent_stops_when_transitions_close() {
    let (orch, _) = orchestrator(MockSubmitter::new(), ConnectivityState::new(Connectivity::Online));
    let (events, rx) = broadcast::channel::<Transition>(16);
    let (out_tx, _out_rx) = mpsc::channel(8);
    let handle = spawn_auto_sync(orch, rx, out_tx, false, CancellationToken::new());

    drop(events);
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn cancel_waits_for_in_flight_pass() {
    let (submitter, gate) = MockSubmitter::gated();
    let (orch, submitter) = orchestrator(submitter, ConnectivityState::new(Connectivity::Online));
    orch.queue().save(sample_entry("A", 1)).unwrap();

    let cancel = CancellationToken::new();
    let (events, rx) = broadcast::channel(16);
    let (out_tx, mut out_rx) = mpsc::channel(8);
    let handle = spawn_auto_sync(Arc::clone(&orch), rx, out_tx, false, cancel.clone());

    events.send(Transition::Online).unwrap();
    while !orch.is_running() {
        tokio::task::yield_now().await;
    }
    cancel.cancel();
    tokio::time::sleep(SETTLE).await;
    assert!(!handle.is_finished());

    gate.add_permits(1);
    handle.await.unwrap();

    let outcome = out_rx.recv().await.unwrap().unwrap();
    assert!(matches!(outcome, PassOutcome::Completed(ref s) if s.succeeded.len() == 1));
    assert!(orch.queue().is_empty().unwrap());
    assert_eq!(submitter.attempt_count(), 1);
    assert!(out_rx.recv().await.is_none());
}
