//! Change detection.
//!
//! Compares a document's baseline with what is on disk right now. Nothing
//! about the on-disk state is cached between calls: the point is to notice
//! edits made in between.

use crate::diff::{baseline_diff, DiffOptions};
use crate::hash::{hash, ContentHash};
use crate::{BaselineStore, TrackedSnapshot, TrackingError, TrackingResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::fs;
use tracing::{debug, warn};

/// How a document relates to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeState {
    /// No baseline has been recorded.
    Untracked,
    /// A baseline exists but the file is gone.
    Missing,
    /// The file matches its baseline.
    Unchanged,
    /// The file differs from its baseline.
    Modified,
}

impl ChangeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeState::Untracked => "untracked",
            ChangeState::Missing => "missing",
            ChangeState::Unchanged => "unchanged",
            ChangeState::Modified => "modified",
        }
    }
}

impl std::fmt::Display for ChangeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is on disk right now.
///
/// Files over the size limit are observed by metadata only: `bytes` and
/// `content_hash` are `None`.
#[derive(Debug, Clone)]
pub struct Observation {
    pub size: u64,
    pub modified_at: SystemTime,
    pub content_hash: Option<ContentHash>,
    bytes: Option<Vec<u8>>,
}

impl Observation {
    /// Raw bytes as read, if the file was small enough to load.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Content as text, with invalid UTF-8 replaced. Only used for display.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.bytes.as_deref().map(String::from_utf8_lossy)
    }

    /// Whether every signal agrees with the snapshot.
    ///
    /// A single differing signal (size, mtime or hash) counts as a change.
    pub fn matches(&self, snapshot: &TrackedSnapshot) -> bool {
        self.size == snapshot.size()
            && self.modified_at == snapshot.modified_at()
            && self.content_hash == Some(snapshot.content_hash())
    }

    /// Unified diff from `baseline` to this observation. Empty when the
    /// current content was not loaded.
    pub fn diff_from(&self, baseline: &TrackedSnapshot, options: DiffOptions) -> String {
        match self.text() {
            Some(text) => baseline_diff(baseline.content(), &text, baseline.identity(), options),
            None => String::new(),
        }
    }
}

/// Result of comparing a document with its baseline.
#[derive(Debug, Clone)]
pub enum Detection {
    Untracked,
    Missing {
        baseline: Arc<TrackedSnapshot>,
    },
    Unchanged {
        baseline: Arc<TrackedSnapshot>,
    },
    Modified {
        baseline: Arc<TrackedSnapshot>,
        current: Observation,
    },
}

impl Detection {
    /// The state without its payload.
    pub fn state(&self) -> ChangeState {
        match self {
            Detection::Untracked => ChangeState::Untracked,
            Detection::Missing { .. } => ChangeState::Missing,
            Detection::Unchanged { .. } => ChangeState::Unchanged,
            Detection::Modified { .. } => ChangeState::Modified,
        }
    }

    /// The baseline the comparison was made against.
    pub fn baseline(&self) -> Option<&Arc<TrackedSnapshot>> {
        match self {
            Detection::Untracked => None,
            Detection::Missing { baseline }
            | Detection::Unchanged { baseline }
            | Detection::Modified { baseline, .. } => Some(baseline),
        }
    }
}

/// Read the current on-disk state of a document.
///
/// Returns `None` if the file does not exist. Content is only loaded when
/// the file is at most `max_size` bytes.
pub async fn observe(identity: &Path, max_size: u64) -> TrackingResult<Option<Observation>> {
    let metadata = match fs::metadata(identity).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(TrackingError::from_io(identity, e)),
    };

    let modified_at = metadata
        .modified()
        .map_err(|e| TrackingError::from_io(identity, e))?;

    if metadata.len() > max_size {
        debug!(
            path = %identity.display(),
            size = metadata.len(),
            max = max_size,
            "Too large to load, comparing metadata only"
        );
        return Ok(Some(Observation {
            size: metadata.len(),
            modified_at,
            content_hash: None,
            bytes: None,
        }));
    }

    let bytes = match fs::read(identity).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(TrackingError::from_io(identity, e)),
    };

    Ok(Some(Observation {
        size: bytes.len() as u64,
        modified_at,
        content_hash: Some(hash(&bytes)),
        bytes: Some(bytes),
    }))
}

/// Compare a document with its baseline.
///
/// A file that has grown past `max_size` is `Modified` without being read.
pub async fn detect(
    store: &BaselineStore,
    identity: &Path,
    max_size: u64,
) -> TrackingResult<Detection> {
    let Some(baseline) = store.get(identity).await else {
        debug!(path = %identity.display(), "No baseline recorded");
        return Ok(Detection::Untracked);
    };

    let Some(current) = observe(identity, max_size).await? else {
        warn!(path = %identity.display(), "Tracked file no longer exists");
        return Ok(Detection::Missing { baseline });
    };

    if current.matches(&baseline) {
        debug!(path = %identity.display(), "File unchanged since baseline");
        return Ok(Detection::Unchanged { baseline });
    }

    warn!(
        path = %identity.display(),
        baseline_hash = %baseline.content_hash().short(),
        current_hash = %current
            .content_hash
            .map(|h| h.short())
            .unwrap_or_else(|| "-".to_string()),
        baseline_size = baseline.size(),
        current_size = current.size,
        "File modified since baseline"
    );
    Ok(Detection::Modified { baseline, current })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn baseline_for(store: &BaselineStore, path: &Path) {
        let snapshot = TrackedSnapshot::load(path, u64::MAX).await.unwrap();
        store.put(snapshot).await;
    }

    #[tokio::test]
    async fn test_untracked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "a").unwrap();

        let store = BaselineStore::new();
        let detection = detect(&store, &path, u64::MAX).await.unwrap();
        assert_eq!(detection.state(), ChangeState::Untracked);
        assert!(detection.baseline().is_none());
    }

    #[tokio::test]
    async fn test_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "a").unwrap();

        let store = BaselineStore::new();
        baseline_for(&store, &path).await;
        assert_eq!(
            detect(&store, &path, u64::MAX).await.unwrap().state(),
            ChangeState::Unchanged
        );
    }

    #[tokio::test]
    async fn test_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "a").unwrap();

        let store = BaselineStore::new();
        baseline_for(&store, &path).await;
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            detect(&store, &path, u64::MAX).await.unwrap().state(),
            ChangeState::Missing
        );
    }

    #[tokio::test]
    async fn test_modified_carries_current_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "Hello World\n").unwrap();

        let store = BaselineStore::new();
        baseline_for(&store, &path).await;
        std::fs::write(&path, "Hello Universe\n").unwrap();

        match detect(&store, &path, u64::MAX).await.unwrap() {
            Detection::Modified { baseline, current } => {
                assert_eq!(baseline.content(), "Hello World\n");
                assert_eq!(current.text().unwrap(), "Hello Universe\n");
            }
            other => panic!("expected modified, got {:?}", other.state()),
        }
    }

    #[tokio::test]
    async fn test_same_size_same_mtime_different_bytes_is_modified() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "abcd").unwrap();

        let store = BaselineStore::new();
        baseline_for(&store, &path).await;
        let mtime = store.get(&path).await.unwrap().modified_at();

        std::fs::write(&path, "abce").unwrap();
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();

        assert_eq!(
            detect(&store, &path, u64::MAX).await.unwrap().state(),
            ChangeState::Modified
        );
    }

    #[tokio::test]
    async fn test_touch_without_content_change_is_modified() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "same").unwrap();

        let store = BaselineStore::new();
        baseline_for(&store, &path).await;
        let mtime = store.get(&path).await.unwrap().modified_at();

        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(mtime + Duration::from_secs(10))
            .unwrap();

        assert_eq!(
            detect(&store, &path, u64::MAX).await.unwrap().state(),
            ChangeState::Modified
        );
    }

    #[tokio::test]
    async fn test_detect_is_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "v1").unwrap();

        let store = BaselineStore::new();
        baseline_for(&store, &path).await;
        assert_eq!(
            detect(&store, &path, u64::MAX).await.unwrap().state(),
            ChangeState::Unchanged
        );

        std::fs::write(&path, "v2 longer").unwrap();
        assert_eq!(
            detect(&store, &path, u64::MAX).await.unwrap().state(),
            ChangeState::Modified
        );
    }

    #[tokio::test]
    async fn test_oversized_file_is_observed_by_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "small").unwrap();

        let store = BaselineStore::new();
        baseline_for(&store, &path).await;
        std::fs::write(&path, "0123456789".repeat(10)).unwrap();

        let current = observe(&path, 16).await.unwrap().unwrap();
        assert_eq!(current.size, 100);
        assert!(current.bytes().is_none());
        assert!(current.content_hash.is_none());

        match detect(&store, &path, 16).await.unwrap() {
            Detection::Modified { baseline, current } => {
                assert!(current.diff_from(&baseline, DiffOptions::default()).is_empty());
            }
            other => panic!("expected modified, got {}", other.state()),
        }
    }
}
