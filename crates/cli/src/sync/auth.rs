// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Credentials attached to each submission attempt.
//!
//! The submitter asks its provider for a header value once per attempt and
//! never caches or inspects it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source of the `Authorization` header value.
///
/// Returns `None` when no credential is available.
pub trait AuthProvider: Send + Sync {
    fn auth_header(&self) -> Option<String>;
}

impl<A: AuthProvider + ?Sized> AuthProvider for Box<A> {
    fn auth_header(&self) -> Option<String> {
        (**self).auth_header()
    }
}

impl<A: AuthProvider + ?Sized> AuthProvider for Arc<A> {
    fn auth_header(&self) -> Option<String> {
        (**self).auth_header()
    }
}

/// No credential. Every submission fails as unauthenticated.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAuth;

impl AuthProvider for NoAuth {
    fn auth_header(&self) -> Option<String> {
        None
    }
}

/// Bearer token obtained externally.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticToken").field(&"<redacted>").finish()
    }
}

impl AuthProvider for StaticToken {
    fn auth_header(&self) -> Option<String> {
        bearer(&self.0)
    }
}

/// Bearer token read from a file on every attempt.
///
/// A login flow can rewrite the file and the next submission picks it up.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: &Path) -> Self {
        TokenFile { path: path.to_path_buf() }
    }
}

impl AuthProvider for TokenFile {
    fn auth_header(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => bearer(&contents),
            Err(e) => {
                tracing::debug!("token file {} unreadable: {}", self.path.display(), e);
                None
            }
        }
    }
}

fn bearer(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(format!("Bearer {token}"))
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
