// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Submission of a single production entry to the remote endpoint.
//!
//! Provides a trait-based submitter that enables:
//! - Real HTTP submission for production
//! - Scripted submitters for unit testing
//!
//! A submitter performs exactly one attempt per call. Retry policy lives in
//! the sync orchestrator.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use pt_core::{ProductionEntry, RemoteRecord};
use reqwest::header::AUTHORIZATION;

use super::auth::AuthProvider;

/// Why a submission did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// No credential was available; no request was made.
    #[error("not authenticated\n  hint: set 'token' or 'token_file' in config.toml, or PRODQ_TOKEN")]
    Unauthenticated,

    /// The endpoint answered with a non-success status.
    ///
    /// Resubmitting the same payload will fail the same way.
    #[error("rejected by server (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Network-level failure; the remote outcome is unknown.
    #[error("server unreachable: {0}")]
    Unreachable(String),
}

impl SubmitError {
    /// Only network-level failures are worth queuing for a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SubmitError::Unreachable(_))
    }
}

/// Result type for submissions.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Boxed future returned by [`Submitter::submit`].
pub type SubmitFuture<'a> = Pin<Box<dyn Future<Output = SubmitResult<RemoteRecord>> + Send + 'a>>;

/// Sends one entry to the remote endpoint.
pub trait Submitter: Send + Sync {
    /// Make exactly one submission attempt.
    fn submit<'a>(&'a self, entry: &'a ProductionEntry) -> SubmitFuture<'a>;
}

/// Submitter that POSTs entries to `{api_url}/production/`.
pub struct HttpSubmitter<A: AuthProvider> {
    client: reqwest::Client,
    endpoint: String,
    auth: A,
}

impl<A: AuthProvider> HttpSubmitter<A> {
    /// Create a submitter for the given API base URL.
    ///
    /// `timeout` bounds the whole request; hitting it counts as unreachable.
    pub fn new(api_url: &str, timeout: Duration, auth: A) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpSubmitter { client, endpoint: production_endpoint(api_url), auth })
    }

    /// The URL entries are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<A: AuthProvider> Submitter for HttpSubmitter<A> {
    fn submit<'a>(&'a self, entry: &'a ProductionEntry) -> SubmitFuture<'a> {
        Box::pin(async move {
            let header = match self.auth.auth_header() {
                Some(h) if !h.trim().is_empty() => h,
                _ => return Err(SubmitError::Unauthenticated),
            };

            let response = self
                .client
                .post(&self.endpoint)
                .header(AUTHORIZATION, header)
                .json(entry)
                .send()
                .await
                .map_err(|e| SubmitError::Unreachable(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                // Stored remotely even if the body turns out unreadable
                let body = match response.json::<serde_json::Value>().await {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::warn!("accepted by server but response body unreadable: {}", e);
                        serde_json::Value::Null
                    }
                };
                return Ok(RemoteRecord::from_body(body));
            }

            let text = response.text().await.unwrap_or_default();
            Err(SubmitError::Rejected {
                status: status.as_u16(),
                detail: rejection_detail(status, &text),
            })
        })
    }
}

/// Join an API base URL with the production collection path.
pub fn production_endpoint(api_url: &str) -> String {
    format!("{}/production/", api_url.trim_end_matches('/'))
}

/// Extract a human-readable reason from an error response body.
///
/// Understands `{"detail": "..."}` and validation-style
/// `{"detail": [{"loc": [...], "msg": "..."}]}`; otherwise falls back to the
/// raw body, then to the status reason.
pub fn rejection_detail(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<String> = items.iter().filter_map(validation_message).collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status.canonical_reason().map(str::to_string).unwrap_or_else(|| format!("HTTP {}", status))
}

fn validation_message(item: &serde_json::Value) -> Option<String> {
    let msg = item.get("msg")?.as_str()?;
    let field = item
        .get("loc")
        .and_then(|loc| loc.as_array())
        .and_then(|loc| loc.last())
        .and_then(|last| last.as_str());
    Some(match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_string(),
    })
}

#[cfg(test)]
#[path = "submitter_tests.rs"]
mod tests;
