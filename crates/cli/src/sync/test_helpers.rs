// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use pt_core::{parse_date, ClockSource, ProductionEntry, RemoteRecord, Shift};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use super::medium::{KvMedium, MediumError, MediumResult};
use super::queue::{QueueStore, SharedQueue};
use super::submitter::{SubmitError, SubmitFuture, Submitter};

/// Create a morning-shift entry for the given machine and quantity.
pub fn sample_entry(machine_id: &str, quantity: i64) -> ProductionEntry {
    ProductionEntry::new(
        parse_date("2024-06-25").unwrap(),
        machine_id,
        Shift::Morning,
        "Widget A",
        quantity,
    )
}

/// Clock whose time advances by one second on every read.
pub struct SteppingClock(AtomicU64);

impl SteppingClock {
    pub fn starting_at(ms: u64) -> Arc<Self> {
        Arc::new(SteppingClock(AtomicU64::new(ms)))
    }
}

impl ClockSource for SteppingClock {
    fn now_ms(&self) -> u64 {
        self.0.fetch_add(1_000, Ordering::SeqCst)
    }
}

/// In-memory medium with switchable failures.
///
/// Clones share the same map, so a test can keep one to inspect state after
/// handing another to a store.
#[derive(Clone, Default)]
pub struct MemoryMedium {
    map: Arc<Mutex<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.map.lock().unwrap().clone()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.map.lock().unwrap().insert(key.to_string(), value.to_string());
    }

    fn check_read(&self) -> MediumResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MediumError::Unavailable("reads disabled".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> MediumResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MediumError::Unavailable("quota exceeded".into()));
        }
        Ok(())
    }
}

impl KvMedium for MemoryMedium {
    fn get(&self, key: &str) -> MediumResult<Option<String>> {
        self.check_read()?;
        Ok(self.map.lock().unwrap().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> MediumResult<()> {
        self.check_write()?;
        self.map.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> MediumResult<bool> {
        self.check_write()?;
        Ok(self.map.lock().unwrap().remove(key).is_some())
    }

    fn entries(&self) -> MediumResult<Vec<(String, String)>> {
        self.check_read()?;
        Ok(self.map.lock().unwrap().iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

/// Queue over a fresh memory medium; returns the medium for inspection.
pub fn memory_queue() -> (SharedQueue<MemoryMedium>, MemoryMedium) {
    let medium = MemoryMedium::new();
    let store = QueueStore::with_clock(medium.clone(), SteppingClock::starting_at(1_000_000))
        .unwrap();
    (SharedQueue::new(store).unwrap(), medium)
}

/// Scripted outcome for [`MockSubmitter`].
#[derive(Debug, Clone)]
pub enum Scripted {
    Accept,
    Reject(u16, &'static str),
    Unreachable,
    Unauthenticated,
}

/// Submitter with per-machine scripted outcomes that records every attempt.
#[derive(Default)]
pub struct MockSubmitter {
    attempts: Arc<Mutex<Vec<ProductionEntry>>>,
    scripts: Mutex<HashMap<String, Scripted>>,
    default: Mutex<Option<Scripted>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every submission waits for a permit on the returned semaphore.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        (MockSubmitter { gate: Some(Arc::clone(&gate)), ..Self::default() }, gate)
    }

    /// Outcome for entries from `machine_id`.
    pub fn script(&self, machine_id: &str, outcome: Scripted) {
        self.scripts.lock().unwrap().insert(machine_id.to_string(), outcome);
    }

    /// Outcome for machines without a script. Defaults to accept.
    pub fn script_default(&self, outcome: Scripted) {
        *self.default.lock().unwrap() = Some(outcome);
    }

    /// Machine ids of every attempt, in order.
    pub fn attempted_machines(&self) -> Vec<String> {
        self.attempts.lock().unwrap().iter().map(|e| e.machine_id.clone()).collect()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    fn outcome_for(&self, entry: &ProductionEntry) -> Scripted {
        if let Some(s) = self.scripts.lock().unwrap().get(&entry.machine_id) {
            return s.clone();
        }
        self.default.lock().unwrap().clone().unwrap_or(Scripted::Accept)
    }
}

impl Submitter for MockSubmitter {
    fn submit<'a>(&'a self, entry: &'a ProductionEntry) -> SubmitFuture<'a> {
        Box::pin(async move {
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }

            let outcome = self.outcome_for(entry);
            if !matches!(outcome, Scripted::Unauthenticated) {
                self.attempts.lock().unwrap().push(entry.clone());
            }

            match outcome {
                Scripted::Accept => Ok(RemoteRecord::from_body(serde_json::json!({
                    "_id": format!("srv-{}", entry.machine_id),
                }))),
                Scripted::Reject(status, detail) => {
                    Err(SubmitError::Rejected { status, detail: detail.to_string() })
                }
                Scripted::Unreachable => Err(SubmitError::Unreachable("connection refused".into())),
                Scripted::Unauthenticated => Err(SubmitError::Unauthenticated),
            }
        })
    }
}

/// Serve one canned HTTP response; the handle yields the raw request.
pub async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
            let len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}
