//! Baseline storage.

use crate::TrackedSnapshot;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as SyncMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

type LockTable = Arc<SyncMutex<HashMap<PathBuf, Arc<Mutex<()>>>>>;

/// Held while a read or edit of one document is in flight.
///
/// Dropping the last guard for a document removes its lock entry, so the
/// table only holds documents that are busy right now.
#[derive(Debug)]
pub struct IdentityGuard {
    guard: Option<OwnedMutexGuard<()>>,
    identity: PathBuf,
    locks: LockTable,
}

impl Drop for IdentityGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.identity)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.identity);
        }
    }
}

/// Process-lifetime table of the last-known-good snapshot per document.
///
/// Nothing is persisted: a new store starts empty and everything is dropped
/// with it. The store is meant to be owned by whoever hosts the session and
/// shared as `Arc<BaselineStore>`.
#[derive(Debug, Default)]
pub struct BaselineStore {
    /// Map from canonical path to its baseline.
    snapshots: RwLock<HashMap<PathBuf, Arc<TrackedSnapshot>>>,
    /// One mutex per busy identity, serialising check-then-write sequences.
    /// Never held across an await.
    locks: LockTable,
}

impl BaselineStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store behind an `Arc`.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Get the baseline for a document.
    pub async fn get(&self, identity: &Path) -> Option<Arc<TrackedSnapshot>> {
        self.snapshots.read().await.get(identity).cloned()
    }

    /// Record a new baseline, replacing any previous one.
    ///
    /// Returns the snapshot that was replaced.
    pub async fn put(&self, snapshot: TrackedSnapshot) -> Option<Arc<TrackedSnapshot>> {
        let identity = snapshot.identity().to_path_buf();
        debug!(
            path = %identity.display(),
            hash = %snapshot.content_hash().short(),
            size = snapshot.size(),
            "Recording baseline"
        );
        self.snapshots
            .write()
            .await
            .insert(identity, Arc::new(snapshot))
    }

    /// Drop the baseline for a document.
    ///
    /// Returns whether a baseline existed.
    pub async fn forget(&self, identity: &Path) -> bool {
        self.snapshots.write().await.remove(identity).is_some()
    }

    /// Acquire the per-document lock.
    ///
    /// Different documents never contend; two callers on the same document
    /// are served one at a time until the guard is dropped.
    pub async fn lock(&self, identity: &Path) -> IdentityGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(identity.to_path_buf())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        IdentityGuard {
            guard: Some(lock.lock_owned().await),
            identity: identity.to_path_buf(),
            locks: self.locks.clone(),
        }
    }

    /// Paths with a baseline, sorted.
    pub async fn tracked(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.snapshots.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Number of tracked documents.
    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    /// Whether nothing is tracked.
    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }

    /// Drop every baseline, and every lock nobody is holding or waiting on.
    pub async fn clear(&self) {
        self.snapshots.write().await.clear();
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    pub(crate) fn lock_entries(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
