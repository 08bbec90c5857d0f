// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value persistence medium underneath the offline queue.
//!
//! The queue store is a thin policy layer over this interface. Each call is
//! a single statement against the backing store, so it either completes or
//! leaves the medium unchanged.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

/// Error type for medium operations.
#[derive(Debug, thiserror::Error)]
pub enum MediumError {
    /// SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The medium refused the operation (disabled, full, read-only).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for medium operations.
pub type MediumResult<T> = Result<T, MediumError>;

/// Durable string key-value storage.
pub trait KvMedium: Send {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> MediumResult<Option<String>>;

    /// Insert or replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> MediumResult<()>;

    /// Delete `key`. Returns whether a value was present.
    fn remove(&mut self, key: &str) -> MediumResult<bool>;

    /// All stored pairs, ordered by key.
    fn entries(&self) -> MediumResult<Vec<(String, String)>>;
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS queue (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// SQLite-backed medium. One row per key.
pub struct SqliteMedium {
    conn: Connection,
}

impl SqliteMedium {
    /// Open (or create) the medium at the given path.
    pub fn open(path: &Path) -> MediumResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    MediumError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open a medium that lives only as long as this value.
    pub fn in_memory() -> MediumResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> MediumResult<Self> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(SqliteMedium { conn })
    }
}

impl KvMedium for SqliteMedium {
    fn get(&self, key: &str) -> MediumResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM queue WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> MediumResult<()> {
        self.conn.execute(
            "INSERT INTO queue (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> MediumResult<bool> {
        let removed = self.conn.execute("DELETE FROM queue WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    fn entries(&self) -> MediumResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM queue ORDER BY key ASC")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "medium_tests.rs"]
mod tests;
