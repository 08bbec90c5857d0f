// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity tracking for the sync loop.
//!
//! The monitor is a two-state machine (online/offline) driven by a host
//! [`ConnectivitySignal`]. It never polls on its own; it reacts to the
//! changes the signal reports and publishes [`Transition`]s to subscribers.
//!
//! Reconnection is only announced after a settle delay, so a flapping link
//! does not trigger a sync attempt on every blip.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;

/// Observed connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn from_online(online: bool) -> Self {
        if online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        *self == Connectivity::Online
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Connectivity::Online => "online",
            Connectivity::Offline => "offline",
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Event published to monitor subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Connectivity returned and stayed up for the settle delay.
    Online,
    /// Connectivity dropped. Status only; a running pass is not cancelled.
    Offline,
}

/// Process-wide online flag.
///
/// Cloning shares the flag. Only the monitor writes it; the orchestrator
/// reads it before starting a pass.
#[derive(Debug, Clone)]
pub struct ConnectivityState(Arc<AtomicBool>);

impl ConnectivityState {
    pub fn new(initial: Connectivity) -> Self {
        ConnectivityState(Arc::new(AtomicBool::new(initial.is_online())))
    }

    pub fn is_online(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn current(&self) -> Connectivity {
        Connectivity::from_online(self.is_online())
    }

    pub(crate) fn set(&self, connectivity: Connectivity) {
        self.0.store(connectivity.is_online(), Ordering::Release);
    }
}

/// Host-provided connectivity signal.
pub trait ConnectivitySignal: Send {
    /// Current status, read once when the monitor starts.
    fn initial(&mut self) -> Pin<Box<dyn Future<Output = Connectivity> + Send + '_>>;

    /// Wait for the next reported status. `None` when the signal ends.
    ///
    /// Must be cancel-safe: the monitor drops this future when its settle
    /// timer fires first.
    fn next_change(&mut self) -> Pin<Box<dyn Future<Output = Option<Connectivity>> + Send + '_>>;
}

/// Signal fed through a channel by the embedding application.
pub struct ChannelSignal {
    initial: Connectivity,
    rx: mpsc::Receiver<Connectivity>,
}

impl ChannelSignal {
    /// Create a signal and the sender used to report changes.
    pub fn new(initial: Connectivity) -> (Self, mpsc::Sender<Connectivity>) {
        let (tx, rx) = mpsc::channel(16);
        (ChannelSignal { initial, rx }, tx)
    }
}

impl ConnectivitySignal for ChannelSignal {
    fn initial(&mut self) -> Pin<Box<dyn Future<Output = Connectivity> + Send + '_>> {
        let initial = self.initial;
        Box::pin(async move { initial })
    }

    fn next_change(&mut self) -> Pin<Box<dyn Future<Output = Option<Connectivity>> + Send + '_>> {
        Box::pin(self.rx.recv())
    }
}

/// Error building a [`ProbeSignal`].
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid API URL '{0}'\n  hint: expected http://host[:port] or https://host[:port]")]
    InvalidUrl(String),
}

/// Signal derived from TCP reachability of the API host.
///
/// Reports only changes: repeated identical probe results are swallowed.
pub struct ProbeSignal {
    target: String,
    interval: Duration,
    timeout: Duration,
    last: Option<Connectivity>,
}

impl ProbeSignal {
    /// Probe the host and port of `api_url` every `interval`.
    pub fn for_url(api_url: &str, interval: Duration) -> Result<Self, ProbeError> {
        let url = reqwest::Url::parse(api_url).map_err(|_| ProbeError::InvalidUrl(api_url.into()))?;
        let host = url.host_str().ok_or_else(|| ProbeError::InvalidUrl(api_url.into()))?;
        let port = url.port_or_known_default().ok_or_else(|| ProbeError::InvalidUrl(api_url.into()))?;

        let target = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };

        Ok(ProbeSignal { target, interval, timeout: Duration::from_secs(3), last: None })
    }

    /// The `host:port` being probed.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Attempt one TCP connection to the target.
    pub async fn probe(&self) -> Connectivity {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.target)).await {
            Ok(Ok(_)) => Connectivity::Online,
            Ok(Err(e)) => {
                tracing::debug!("probe of {} failed: {}", self.target, e);
                Connectivity::Offline
            }
            Err(_) => {
                tracing::debug!("probe of {} timed out", self.target);
                Connectivity::Offline
            }
        }
    }
}

impl ConnectivitySignal for ProbeSignal {
    fn initial(&mut self) -> Pin<Box<dyn Future<Output = Connectivity> + Send + '_>> {
        Box::pin(async move {
            let status = self.probe().await;
            self.last = Some(status);
            status
        })
    }

    fn next_change(&mut self) -> Pin<Box<dyn Future<Output = Option<Connectivity>> + Send + '_>> {
        Box::pin(async move {
            loop {
                tokio::time::sleep(self.interval).await;
                let status = self.probe().await;
                if self.last != Some(status) {
                    self.last = Some(status);
                    return Some(status);
                }
            }
        })
    }
}

/// Tracks online/offline state and announces settled transitions.
pub struct ConnectivityMonitor {
    state: ConnectivityState,
    settle_delay: Duration,
    events: broadcast::Sender<Transition>,
}

impl ConnectivityMonitor {
    /// Create a monitor starting in the given state.
    pub fn new(initial: Connectivity, settle_delay: Duration) -> Self {
        let (events, _) = broadcast::channel(16);
        ConnectivityMonitor { state: ConnectivityState::new(initial), settle_delay, events }
    }

    /// Create a monitor whose initial state is read from the signal.
    pub async fn from_signal<S: ConnectivitySignal>(signal: &mut S, settle_delay: Duration) -> Self {
        let initial = signal.initial().await;
        tracing::info!("initial connectivity: {}", initial);
        Self::new(initial, settle_delay)
    }

    /// Shared handle to the online flag.
    pub fn state(&self) -> ConnectivityState {
        self.state.clone()
    }

    pub fn is_online(&self) -> bool {
        self.state.is_online()
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Subscribe to transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<Transition> {
        self.events.subscribe()
    }

    /// Record an observed status. Returns it if it changed the state.
    fn observe(&self, observed: Connectivity) -> Option<Connectivity> {
        if self.state.current() == observed {
            return None;
        }
        self.state.set(observed);
        Some(observed)
    }

    fn emit(&self, transition: Transition) {
        // No subscribers is not an error
        let _ = self.events.send(transition);
    }

    /// Drive the state machine from `signal` until it ends or `cancel` fires.
    pub async fn run<S: ConnectivitySignal>(&self, mut signal: S, cancel: CancellationToken) {
        let mut settle: Option<Pin<Box<Sleep>>> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = wait_settled(&mut settle) => {
                    settle = None;
                    if self.state.is_online() {
                        tracing::info!("connectivity settled online");
                        self.emit(Transition::Online);
                    }
                }
                observed = signal.next_change() => match observed {
                    None => {
                        tracing::debug!("connectivity signal closed");
                        return;
                    }
                    Some(observed) => match self.observe(observed) {
                        Some(Connectivity::Online) => {
                            tracing::info!("connectivity restored; settling for {:?}", self.settle_delay);
                            settle = Some(Box::pin(tokio::time::sleep(self.settle_delay)));
                        }
                        Some(Connectivity::Offline) => {
                            tracing::info!("connectivity lost");
                            settle = None;
                            self.emit(Transition::Offline);
                        }
                        None => {}
                    },
                },
            }
        }
    }

    /// Run the monitor on a background task.
    pub fn spawn<S>(self: Arc<Self>, signal: S, cancel: CancellationToken) -> JoinHandle<()>
    where
        S: ConnectivitySignal + 'static,
    {
        tokio::spawn(async move { self.run(signal, cancel).await })
    }
}

async fn wait_settled(settle: &mut Option<Pin<Box<Sleep>>>) {
    match settle.as_mut() {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
