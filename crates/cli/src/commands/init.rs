// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::{config_path, Config};
use crate::error::{Error, Result};
use crate::sync::ProbeSignal;

use super::open_queue;

pub fn run(state_dir: &Path, api_url: Option<String>) -> Result<()> {
    let config = run_impl(state_dir, api_url)?;
    println!("Initialized prodq at {}", state_dir.display());
    println!("API: {}", config.api_url);
    Ok(())
}

pub(crate) fn run_impl(state_dir: &Path, api_url: Option<String>) -> Result<Config> {
    let path = config_path(state_dir);
    if path.exists() {
        return Err(Error::AlreadyInitialized(path.display().to_string()));
    }

    let mut config = Config::default();
    if let Some(url) = api_url {
        // Validated here so a typo surfaces now rather than at first sync
        ProbeSignal::for_url(&url, config.probe_interval())?;
        config.api_url = url;
    }

    config.save(state_dir)?;
    open_queue(state_dir)?;
    tracing::info!("initialized state dir {}", state_dir.display());
    Ok(config)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
