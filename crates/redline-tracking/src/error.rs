//! Tracking error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for tracking operations.
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Errors that can occur while reading, checking or editing a document.
///
/// Refusals (conflict, no match, ambiguous match) are not errors; they are
/// reported through [`crate::EditOutcome`].
#[derive(Debug, Error)]
pub enum TrackingError {
    /// The document does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The document exists but cannot be accessed.
    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// The document is not UTF-8 text.
    #[error("Cannot decode {} as text: {reason}", .path.display())]
    Encoding { path: PathBuf, reason: String },

    /// The document is larger than the configured maximum.
    #[error("File too large ({size} bytes). Maximum allowed size is {max} bytes.")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    /// The request itself is malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other IO failure.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackingError {
    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an encoding error.
    pub fn encoding(path: &Path, reason: impl Into<String>) -> Self {
        Self::Encoding {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Classify an IO error raised while touching `path`.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::InvalidData => Self::encoding(path, err.to_string()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}
