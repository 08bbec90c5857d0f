// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Exchanging a username and password for a bearer token.
//!
//! The API issues tokens from `POST {api_url}/auth/token`, which takes an
//! OAuth2 password form and answers `{"access_token": ..., "token_type":
//! "bearer"}`. The token is written to a file that [`TokenFile`] re-reads on
//! every submission.
//!
//! [`TokenFile`]: super::auth::TokenFile

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::submitter::rejection_detail;

/// Why a login attempt did not produce a token.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// The server refused the credentials or the request.
    #[error("login refused (HTTP {status}): {detail}")]
    Refused { status: u16, detail: String },

    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// A success status without a usable token in the body.
    #[error("unexpected token response: {0}")]
    MalformedResponse(String),

    #[error("cannot write token file {}: {source}", path.display())]
    TokenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Token issued by the server.
#[derive(Clone, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Client for the token endpoint.
pub struct TokenClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TokenClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(TokenClient { client, endpoint: token_endpoint(api_url) })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make one login attempt.
    pub async fn request_token(&self, username: &str, password: &str) -> Result<IssuedToken, LoginError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| LoginError::Unreachable(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(LoginError::Refused {
                status: status.as_u16(),
                detail: rejection_detail(status, &text),
            });
        }

        let token: IssuedToken = serde_json::from_str(&text)
            .map_err(|e| LoginError::MalformedResponse(e.to_string()))?;
        if token.access_token.trim().is_empty() {
            return Err(LoginError::MalformedResponse("empty access_token".to_string()));
        }
        if let Some(kind) = token.token_type.as_deref().filter(|k| !k.eq_ignore_ascii_case("bearer")) {
            tracing::warn!("server issued a '{}' token; it will be sent as a bearer token", kind);
        }
        Ok(token)
    }
}

/// Join an API base URL with the token path.
pub fn token_endpoint(api_url: &str) -> String {
    format!("{}/auth/token", api_url.trim_end_matches('/'))
}

/// Write `token` to `path`, replacing any previous token.
///
/// On Unix a newly created file is readable by the owner only.
pub fn store_token(path: &Path, token: &str) -> Result<(), LoginError> {
    let wrap = |source| LoginError::TokenFile { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    let mut options = fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(wrap)?;
    writeln!(file, "{}", token.trim()).map_err(wrap)?;
    tracing::info!("stored access token in {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
