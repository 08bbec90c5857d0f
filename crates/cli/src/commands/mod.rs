// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod init;
pub mod login;
pub mod queue;
pub mod status;
pub mod submit;
pub mod sync;
pub mod watch;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{queue_path, Config};
use crate::error::{Error, Result};
use crate::sync::{
    AuthProvider, HttpSubmitter, ProbeSignal, QueueStore, SharedQueue, SqliteMedium,
};

/// Submitter used by every command that talks to the API.
pub type ApiSubmitter = HttpSubmitter<Box<dyn AuthProvider>>;

/// Resolved state directory plus its configuration.
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn load(state_dir: PathBuf) -> Result<Self> {
        let config = Config::load(&state_dir)?;
        tracing::debug!("state dir {}, api {}", state_dir.display(), config.api_url);
        Ok(Context { state_dir, config })
    }

    /// Open the on-disk queue.
    pub fn open_queue(&self) -> Result<SharedQueue<SqliteMedium>> {
        open_queue(&self.state_dir)
    }

    pub fn submitter(&self) -> Result<ApiSubmitter> {
        let auth = self.config.auth_provider(&self.state_dir);
        Ok(HttpSubmitter::new(&self.config.api_url, self.config.request_timeout(), auth)?)
    }

    /// TCP reachability probe for the API host.
    pub fn probe(&self) -> Result<ProbeSignal> {
        Ok(ProbeSignal::for_url(&self.config.api_url, self.config.probe_interval())?)
    }
}

pub fn open_queue(state_dir: &Path) -> Result<SharedQueue<SqliteMedium>> {
    let medium = SqliteMedium::open(&queue_path(state_dir))?;
    Ok(SharedQueue::new(QueueStore::open(medium)?)?)
}

/// Runtime for commands that do network I/O.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
