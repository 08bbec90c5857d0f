// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration and state directory layout.
//!
//! Configuration is stored in `<state_dir>/config.toml`. Every field has a
//! default, so a missing file is the same as an empty one:
//! - `api_url`: base URL of the production API
//! - `token` / `token_file`: bearer credential, inline or read per request
//! - `request_timeout_secs`, `settle_delay_ms`, `probe_interval_ms`: timing

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};
use crate::sync::{AuthProvider, NoAuth, StaticToken, TokenFile};

const APP_DIR_NAME: &str = "prodq";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_FILE_NAME: &str = "queue.db";
const LOG_FILE_NAME: &str = "prodq.log";
const WATCH_LOCK_NAME: &str = "watch.lock";

/// Token file written by `prodq login` when `token_file` is not configured.
pub const DEFAULT_TOKEN_FILE: &str = "token";

/// Client configuration stored in `<state_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the production API (entries go to `{api_url}/production/`).
    pub api_url: String,
    /// Bearer token sent with every submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// File holding the bearer token, re-read per request. Relative paths
    /// are resolved against the state directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
    /// Upper bound for a single submission, in seconds.
    pub request_timeout_secs: u64,
    /// How long connectivity must hold before a reconnect triggers a sync.
    pub settle_delay_ms: u64,
    /// How often `prodq watch` probes the API host.
    pub probe_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: "http://localhost:8000".to_string(),
            token: None,
            token_file: None,
            request_timeout_secs: 10,
            settle_delay_ms: 2_000,
            probe_interval_ms: 5_000,
        }
    }
}

impl Config {
    /// Loads configuration from the state directory, with env overrides.
    ///
    /// A missing file yields the defaults.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config = Self::load_file(state_dir)?;
        Ok(config.with_overrides(env::api_url(), env::token()))
    }

    /// Loads the file only, without env overrides.
    pub fn load_file(state_dir: &Path) -> Result<Self> {
        let config_path = config_path(state_dir);
        if !config_path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// Saves configuration to the state directory, creating it if needed.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        fs::create_dir_all(state_dir)?;
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(config_path(state_dir), content)?;
        Ok(())
    }

    /// Applies overrides taken from the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, token: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(token) = token {
            self.token = Some(token);
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_millis(self.probe_interval_ms)
    }

    /// Picks the credential source: inline token, then token file, then none.
    pub fn auth_provider(&self, state_dir: &Path) -> Box<dyn AuthProvider> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Box::new(StaticToken::new(token));
        }
        if let Some(file) = &self.token_file {
            return Box::new(TokenFile::new(&state_dir.join(file)));
        }
        Box::new(NoAuth)
    }
}

/// Resolve the state directory.
///
/// Order: `--state-dir`, `PRODQ_STATE_DIR`, `$XDG_STATE_HOME/prodq`, the
/// platform state dir, then `~/.local/state/prodq`.
pub fn resolve_state_dir(flag: Option<&Path>) -> PathBuf {
    state_dir_from(
        flag.map(Path::to_path_buf),
        env::state_dir(),
        env::xdg_state_home(),
        dirs::state_dir(),
        dirs::home_dir(),
    )
}

fn state_dir_from(
    flag: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    xdg: Option<PathBuf>,
    platform: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = flag.or(env_dir) {
        return dir;
    }
    if let Some(dir) = xdg.or(platform) {
        return dir.join(APP_DIR_NAME);
    }
    home.map(|h| h.join(".local/state").join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".local/state").join(APP_DIR_NAME))
}

pub fn config_path(state_dir: &Path) -> PathBuf {
    state_dir.join(CONFIG_FILE_NAME)
}

/// SQLite file backing the offline queue.
pub fn queue_path(state_dir: &Path) -> PathBuf {
    state_dir.join(QUEUE_FILE_NAME)
}

pub fn log_path(state_dir: &Path) -> PathBuf {
    state_dir.join(LOG_FILE_NAME)
}

/// Lock held by a running `prodq watch`.
pub fn watch_lock_path(state_dir: &Path) -> PathBuf {
    state_dir.join(WATCH_LOCK_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
