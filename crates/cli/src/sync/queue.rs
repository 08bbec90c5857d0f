// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue for production entries that could not be submitted.
//!
//! Entries are keyed by their [`LocalId`] in a [`KvMedium`]. Because ids are
//! timestamp-prefixed, key order is creation order and replay follows the
//! order in which entries were captured.

use std::sync::{Arc, Mutex, MutexGuard};

use pt_core::{ClockSource, LocalId, LocalIdGenerator, ProductionEntry, SystemClock};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::medium::{KvMedium, MediumError};

/// Error type for queue operations.
///
/// Never swallowed: a failed save means the entry is lost, and the caller
/// must surface that as a hard failure.
#[derive(Debug, thiserror::Error)]
pub enum StorageFailure {
    /// The medium failed or refused the operation.
    #[error("local storage failure: {0}")]
    Medium(#[from] MediumError),

    /// A stored value could not be decoded.
    #[error("corrupt queue entry '{key}': {source}\n  hint: remove it with 'prodq queue discard {key}'")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// An entry could not be encoded for storage.
    #[error("cannot encode queue entry: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, StorageFailure>;

/// A production entry waiting to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedEntry {
    #[serde(rename = "localId")]
    pub local_id: LocalId,
    pub payload: ProductionEntry,
    #[serde(default)]
    pub synced: bool,
}

/// Persistent queue of entries awaiting submission.
pub struct QueueStore<M: KvMedium> {
    medium: M,
    ids: LocalIdGenerator<Arc<dyn ClockSource>>,
}

impl<M: KvMedium> QueueStore<M> {
    /// Open a queue over the given medium using the system clock.
    pub fn open(medium: M) -> QueueResult<Self> {
        Self::with_clock(medium, Arc::new(SystemClock))
    }

    /// Open a queue with a custom clock for id generation.
    ///
    /// The id generator is advanced past any ids already in the medium. Only
    /// keys are inspected, so a corrupt value does not prevent opening.
    pub fn with_clock(medium: M, clock: Arc<dyn ClockSource>) -> QueueResult<Self> {
        let store = QueueStore { medium, ids: LocalIdGenerator::with_clock(clock) };
        let last = store
            .medium
            .entries()?
            .into_iter()
            .filter_map(|(key, _)| LocalId::parse(&key).ok())
            .max();
        if let Some(last) = last {
            store.ids.observe(&last);
        }
        Ok(store)
    }

    /// Persist a new entry and return the stored record.
    pub fn save(&mut self, payload: ProductionEntry) -> QueueResult<QueuedEntry> {
        let mut local_id = self.ids.next_id();
        while self.medium.get(local_id.as_str())?.is_some() {
            local_id = self.ids.next_id();
        }

        let entry = QueuedEntry { local_id, payload, synced: false };
        self.write(&entry)?;
        tracing::debug!(local_id = %entry.local_id, "queued entry");
        Ok(entry)
    }

    /// All queued entries, oldest first.
    pub fn list_all(&self) -> QueueResult<Vec<QueuedEntry>> {
        let mut entries = self
            .medium
            .entries()?
            .into_iter()
            .map(|(key, value)| decode(&key, &value))
            .collect::<QueueResult<Vec<_>>>()?;
        entries.sort_by(|a, b| a.local_id.cmp(&b.local_id));
        Ok(entries)
    }

    /// Look up a single entry.
    pub fn get(&self, local_id: &LocalId) -> QueueResult<Option<QueuedEntry>> {
        match self.medium.get(local_id.as_str())? {
            Some(value) => Ok(Some(decode(local_id.as_str(), &value)?)),
            None => Ok(None),
        }
    }

    /// Check whether an entry is stored, without decoding it.
    pub fn contains(&self, local_id: &LocalId) -> QueueResult<bool> {
        Ok(self.medium.get(local_id.as_str())?.is_some())
    }

    /// Delete an entry. Removing an absent id is a no-op.
    ///
    /// The stored value is never decoded, so corrupt entries can be removed.
    pub fn remove(&mut self, local_id: &LocalId) -> QueueResult<()> {
        if self.medium.remove(local_id.as_str())? {
            tracing::debug!(%local_id, "removed queued entry");
        }
        Ok(())
    }

    /// Flag an entry as synced without deleting it. Absent ids are ignored.
    pub fn mark_synced(&mut self, local_id: &LocalId) -> QueueResult<()> {
        if let Some(mut entry) = self.get(local_id)? {
            if !entry.synced {
                entry.synced = true;
                self.write(&entry)?;
            }
        }
        Ok(())
    }

    /// Number of queued entries.
    pub fn len(&self) -> QueueResult<usize> {
        Ok(self.medium.entries()?.len())
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len()? == 0)
    }

    fn write(&mut self, entry: &QueuedEntry) -> QueueResult<()> {
        let json = serde_json::to_string(entry).map_err(StorageFailure::Encode)?;
        self.medium.set(entry.local_id.as_str(), &json)?;
        Ok(())
    }
}

fn decode(key: &str, value: &str) -> QueueResult<QueuedEntry> {
    serde_json::from_str(value)
        .map_err(|source| StorageFailure::Corrupt { key: key.to_string(), source })
}

/// Shared handle to a [`QueueStore`].
///
/// Every mutation goes through this handle, and after each one the pending-id
/// projection is re-read from the store. The projection holds the ids of
/// unsynced entries, oldest first. It is never edited on its own, so it
/// cannot drift from what is persisted.
pub struct SharedQueue<M: KvMedium> {
    store: Arc<Mutex<QueueStore<M>>>,
    pending: Arc<watch::Sender<Vec<LocalId>>>,
}

impl<M: KvMedium> Clone for SharedQueue<M> {
    fn clone(&self) -> Self {
        SharedQueue { store: Arc::clone(&self.store), pending: Arc::clone(&self.pending) }
    }
}

impl<M: KvMedium> SharedQueue<M> {
    /// Wrap a store, seeding the projection from its current contents.
    pub fn new(store: QueueStore<M>) -> QueueResult<Self> {
        let ids = pending_ids(&store)?;
        let (pending, _) = watch::channel(ids);
        Ok(SharedQueue { store: Arc::new(Mutex::new(store)), pending: Arc::new(pending) })
    }

    /// Subscribe to the pending-id projection.
    pub fn watch(&self) -> watch::Receiver<Vec<LocalId>> {
        self.pending.subscribe()
    }

    /// Ids currently in the projection.
    pub fn pending(&self) -> Vec<LocalId> {
        self.pending.borrow().clone()
    }

    pub fn save(&self, payload: ProductionEntry) -> QueueResult<QueuedEntry> {
        let mut store = self.lock();
        let entry = store.save(payload)?;
        self.refresh(&store);
        Ok(entry)
    }

    pub fn list_all(&self) -> QueueResult<Vec<QueuedEntry>> {
        self.lock().list_all()
    }

    pub fn get(&self, local_id: &LocalId) -> QueueResult<Option<QueuedEntry>> {
        self.lock().get(local_id)
    }

    pub fn contains(&self, local_id: &LocalId) -> QueueResult<bool> {
        self.lock().contains(local_id)
    }

    pub fn remove(&self, local_id: &LocalId) -> QueueResult<()> {
        let mut store = self.lock();
        store.remove(local_id)?;
        self.refresh(&store);
        Ok(())
    }

    pub fn mark_synced(&self, local_id: &LocalId) -> QueueResult<()> {
        let mut store = self.lock();
        store.mark_synced(local_id)?;
        self.refresh(&store);
        Ok(())
    }

    pub fn len(&self) -> QueueResult<usize> {
        self.lock().len()
    }

    pub fn is_empty(&self) -> QueueResult<bool> {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, QueueStore<M>> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    // A failed re-read leaves the previous projection in place; the
    // mutation itself already succeeded and is reported as such.
    fn refresh(&self, store: &QueueStore<M>) {
        match pending_ids(store) {
            Ok(ids) => {
                self.pending.send_replace(ids);
            }
            Err(e) => tracing::warn!("failed to refresh queue projection: {}", e),
        }
    }
}

// Corrupt values are left out: they cannot be replayed, only discarded.
fn pending_ids<M: KvMedium>(store: &QueueStore<M>) -> QueueResult<Vec<LocalId>> {
    let mut ids = Vec::new();
    for (key, value) in store.medium.entries()? {
        match decode(&key, &value) {
            Ok(entry) if !entry.synced => ids.push(entry.local_id),
            Ok(_) => {}
            Err(e) => tracing::warn!("{}", e),
        }
    }
    ids.sort();
    Ok(ids)
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
