// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Password login against `{api_url}/auth/token`.

use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, DEFAULT_TOKEN_FILE};
use crate::env;
use crate::error::{Error, Result};
use crate::sync::{store_token, TokenClient};

use super::{runtime, Context};

pub fn run(ctx: &Context, username: &str, password: Option<String>) -> Result<()> {
    let password = match password.or_else(env::password) {
        Some(password) => password,
        None => read_password()?,
    };
    let client = TokenClient::new(&ctx.config.api_url, ctx.config.request_timeout())?;
    let path = runtime()?.block_on(run_impl(&ctx.state_dir, &client, username, &password))?;

    println!("Logged in as {}; token stored in {}", username, path.display());
    if ctx.config.token.is_some() {
        eprintln!("warning: an inline token ('token' in config.toml or PRODQ_TOKEN) takes precedence");
    }
    Ok(())
}

/// Request a token and store it where the configured token file points.
///
/// Without a configured `token_file`, the token goes to the default file in
/// the state directory and the config file is updated to point at it.
pub(crate) async fn run_impl(
    state_dir: &Path,
    client: &TokenClient,
    username: &str,
    password: &str,
) -> Result<PathBuf> {
    if password.is_empty() {
        return Err(Error::PasswordRequired);
    }

    let token = client.request_token(username, password).await?;
    tracing::info!(username, endpoint = client.endpoint(), "login succeeded");

    let mut config = Config::load_file(state_dir)?;
    let token_file = config.token_file.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));
    let path = state_dir.join(&token_file);
    store_token(&path, &token.access_token)?;

    if config.token_file.is_none() {
        config.token_file = Some(token_file);
        config.save(state_dir)?;
    }
    Ok(path)
}

fn read_password() -> Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        std::io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
