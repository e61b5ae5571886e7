//! Tracked snapshots.

use crate::hash::{hash, ContentHash};
use crate::{TrackingError, TrackingResult};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Bytes inspected for NUL when deciding whether a file is binary.
const BINARY_SAMPLE: usize = 8192;

/// The last-known-good state of a document.
///
/// Fields are private and filled in by the constructors, so `size` is always
/// the byte length of `content` and `content_hash` always its digest. A
/// snapshot is replaced as a whole, never patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSnapshot {
    identity: PathBuf,
    size: u64,
    modified_at: SystemTime,
    content_hash: ContentHash,
    content: String,
}

impl TrackedSnapshot {
    /// Build a snapshot from text content.
    pub fn new(identity: impl Into<PathBuf>, content: String, modified_at: SystemTime) -> Self {
        Self {
            identity: identity.into(),
            size: content.len() as u64,
            modified_at,
            content_hash: hash(content.as_bytes()),
            content,
        }
    }

    /// Build a snapshot from raw bytes, decoding them as UTF-8 text.
    pub fn from_bytes(
        identity: impl Into<PathBuf>,
        bytes: Vec<u8>,
        modified_at: SystemTime,
    ) -> TrackingResult<Self> {
        let identity = identity.into();
        let content = decode_text(&identity, bytes)?;
        Ok(Self::new(identity, content, modified_at))
    }

    /// Load a document from disk.
    ///
    /// Metadata comes from the same open handle the bytes are read from.
    pub async fn load(identity: &Path, max_size: u64) -> TrackingResult<Self> {
        let mut file = fs::File::open(identity)
            .await
            .map_err(|e| TrackingError::from_io(identity, e))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| TrackingError::from_io(identity, e))?;

        if !metadata.is_file() {
            return Err(TrackingError::invalid_request(format!(
                "{} is not a regular file",
                identity.display()
            )));
        }
        if metadata.len() > max_size {
            return Err(TrackingError::TooLarge {
                path: identity.to_path_buf(),
                size: metadata.len(),
                max: max_size,
            });
        }

        let modified_at = metadata
            .modified()
            .map_err(|e| TrackingError::from_io(identity, e))?;

        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        file.read_to_end(&mut bytes)
            .await
            .map_err(|e| TrackingError::from_io(identity, e))?;

        Self::from_bytes(identity, bytes, modified_at)
    }

    /// Canonical document path.
    pub fn identity(&self) -> &Path {
        &self.identity
    }

    /// Byte length of the content.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Modification time recorded with the snapshot.
    pub fn modified_at(&self) -> SystemTime {
        self.modified_at
    }

    /// Digest of the content bytes.
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// Full text content.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Decode file bytes as text, rejecting binary files.
pub(crate) fn decode_text(path: &Path, bytes: Vec<u8>) -> TrackingResult<String> {
    let sample = &bytes[..bytes.len().min(BINARY_SAMPLE)];
    if sample.contains(&0) {
        return Err(TrackingError::encoding(path, "file appears to be binary"));
    }

    String::from_utf8(bytes).map_err(|e| {
        TrackingError::encoding(
            path,
            format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_is_consistent() {
        let snapshot = TrackedSnapshot::new("/docs/a.md", "héllo\n".to_string(), SystemTime::now());
        assert_eq!(snapshot.size(), "héllo\n".len() as u64);
        assert_eq!(snapshot.content_hash(), hash("héllo\n".as_bytes()));
        assert_eq!(snapshot.identity(), Path::new("/docs/a.md"));
    }

    #[test]
    fn test_from_bytes_rejects_binary() {
        let err = TrackedSnapshot::from_bytes("/docs/a.pdf", vec![b'%', 0, 1, 2], SystemTime::now())
            .unwrap_err();
        assert!(matches!(err, TrackingError::Encoding { .. }));
    }

    #[test]
    fn test_from_bytes_rejects_invalid_utf8() {
        let err = TrackedSnapshot::from_bytes("/docs/a.tex", vec![b'o', b'k', 0xff], SystemTime::now())
            .unwrap_err();
        match err {
            TrackingError::Encoding { reason, .. } => assert!(reason.contains("byte 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_reads_content_and_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("b.tex");
        std::fs::write(&path, "alpha beta").unwrap();

        let snapshot = TrackedSnapshot::load(&path, 1024).await.unwrap();
        assert_eq!(snapshot.content(), "alpha beta");
        assert_eq!(snapshot.size(), 10);
        assert_eq!(
            snapshot.modified_at(),
            std::fs::metadata(&path).unwrap().modified().unwrap()
        );
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = TrackedSnapshot::load(&dir.path().join("nope.md"), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackingError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_load_too_large() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.md");
        std::fs::write(&path, "0123456789").unwrap();

        let err = TrackedSnapshot::load(&path, 4).await.unwrap_err();
        assert!(matches!(err, TrackingError::TooLarge { size: 10, max: 4, .. }));
    }

    #[tokio::test]
    async fn test_load_directory_is_invalid() {
        let dir = TempDir::new().unwrap();
        let err = TrackedSnapshot::load(dir.path(), 1024).await.unwrap_err();
        assert!(matches!(err, TrackingError::InvalidRequest(_)));
    }
}
