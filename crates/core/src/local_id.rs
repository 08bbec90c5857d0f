// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client-generated identifiers for queued entries.
//!
//! Format: `{wall_ms:013}-{suffix:08x}`
//!
//! The timestamp is zero-padded so that lexicographic order equals creation
//! order. The suffix is random and only disambiguates ids minted by
//! different processes in the same millisecond.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use crate::clock::{ClockSource, SystemClock};
use crate::error::{Error, Result};

const WALL_DIGITS: usize = 13;
const SUFFIX_DIGITS: usize = 8;

/// Identifier of a queued entry, distinct from any server-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalId(String);

impl LocalId {
    /// Largest timestamp that fits the fixed-width encoding (year 2286).
    pub const MAX_WALL_MS: u64 = 9_999_999_999_999;

    /// Builds an id from its components.
    ///
    /// `wall_ms` is clamped to [`LocalId::MAX_WALL_MS`] so the result always
    /// parses back.
    pub fn from_parts(wall_ms: u64, suffix: u32) -> Self {
        let wall_ms = wall_ms.min(Self::MAX_WALL_MS);
        LocalId(format!("{wall_ms:013}-{suffix:08x}"))
    }

    /// Parses an id from its string representation.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    /// Milliseconds since Unix epoch encoded in the id.
    pub fn wall_ms(&self) -> u64 {
        self.0[..WALL_DIGITS].parse().unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocalId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (wall, suffix) = s.split_once('-').ok_or_else(|| {
            Error::InvalidLocalId(format!("expected format 'wall_ms-suffix', got '{s}'"))
        })?;

        if wall.len() != WALL_DIGITS || !wall.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidLocalId(format!(
                "timestamp must be {WALL_DIGITS} digits in '{s}'"
            )));
        }

        let suffix_ok = suffix.len() == SUFFIX_DIGITS
            && suffix.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !suffix_ok {
            return Err(Error::InvalidLocalId(format!(
                "suffix must be {SUFFIX_DIGITS} lowercase hex digits in '{s}'"
            )));
        }

        Ok(LocalId(s.to_string()))
    }
}

impl TryFrom<String> for LocalId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<LocalId> for String {
    fn from(id: LocalId) -> Self {
        id.0
    }
}

/// Mints strictly increasing [`LocalId`]s.
///
/// If the wall clock stalls or goes backwards the timestamp component is
/// bumped past the last issued one, so ids from one generator never tie.
pub struct LocalIdGenerator<C: ClockSource = SystemClock> {
    clock: C,
    last_wall_ms: Mutex<u64>,
}

impl LocalIdGenerator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for LocalIdGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> LocalIdGenerator<C> {
    /// Creates a generator with a custom clock source.
    pub fn with_clock(clock: C) -> Self {
        LocalIdGenerator { clock, last_wall_ms: Mutex::new(0) }
    }

    /// Generates the next id.
    pub fn next_id(&self) -> LocalId {
        let physical = self.clock.now_ms();
        let mut last_ms = self.last_wall_ms.lock().unwrap_or_else(|e| e.into_inner());

        let wall_ms = if physical > *last_ms { physical } else { *last_ms + 1 };
        *last_ms = wall_ms;

        LocalId::from_parts(wall_ms, rand::random::<u32>())
    }

    /// Ensures later ids sort after `id`.
    ///
    /// Used when reopening a store that already holds ids from an earlier run.
    pub fn observe(&self, id: &LocalId) {
        let mut last_ms = self.last_wall_ms.lock().unwrap_or_else(|e| e.into_inner());
        *last_ms = (*last_ms).max(id.wall_ms());
    }
}

#[cfg(test)]
#[path = "local_id_tests.rs"]
mod tests;
