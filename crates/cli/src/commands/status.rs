// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::Connectivity;

use super::{print_json, runtime, Context};

#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub api_url: String,
    pub target: String,
    pub connectivity: &'static str,
    pub pending: usize,
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "API:          {}", self.api_url)?;
        writeln!(f, "Connectivity: {} ({})", self.connectivity, self.target)?;
        write!(f, "Pending:      {}", self.pending)
    }
}

pub fn run(ctx: &Context, output: OutputFormat) -> Result<()> {
    let pending = ctx.open_queue()?.pending().len();
    let probe = ctx.probe()?;
    let connectivity = runtime()?.block_on(probe.probe());

    let report = build_report(ctx, probe.target(), connectivity, pending);
    match output {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => print_json(&report)?,
    }
    Ok(())
}

pub(crate) fn build_report(
    ctx: &Context,
    target: &str,
    connectivity: Connectivity,
    pending: usize,
) -> StatusReport {
    StatusReport {
        api_url: ctx.config.api_url.clone(),
        target: target.to_string(),
        connectivity: connectivity.as_str(),
        pending,
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
