//! Tool error types.

use redline_tracking::TrackingError;
use thiserror::Error;

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur during tool execution.
///
/// Edit refusals are not errors. A conflict, a missing match or an
/// ambiguous match is a completed execution whose metadata names the
/// outcome.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Invalid parameters.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Permission denied.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The document is not UTF-8 text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<TrackingError> for ToolError {
    fn from(err: TrackingError) -> Self {
        match err {
            TrackingError::FileNotFound(path) => Self::FileNotFound(path.display().to_string()),
            TrackingError::PermissionDenied(path) => {
                Self::PermissionDenied(path.display().to_string())
            }
            TrackingError::InvalidRequest(message) => Self::Validation(message),
            err @ TrackingError::Encoding { .. } => Self::Encoding(err.to_string()),
            err @ TrackingError::TooLarge { .. } => Self::Validation(err.to_string()),
            err @ TrackingError::Io { .. } => Self::ExecutionFailed(err.to_string()),
        }
    }
}

impl From<redline_util::Error> for ToolError {
    fn from(err: redline_util::Error) -> Self {
        use redline_util::ErrorKind;
        match err.kind() {
            ErrorKind::InvalidInput => Self::Validation(err.to_string()),
            ErrorKind::NotFound => Self::FileNotFound(err.to_string()),
            ErrorKind::PermissionDenied | ErrorKind::OutsideRoot => {
                Self::PermissionDenied(err.to_string())
            }
            ErrorKind::Io => Self::ExecutionFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_tracking_errors_map() {
        let err: ToolError = TrackingError::FileNotFound(PathBuf::from("/docs/a.md")).into();
        assert!(matches!(err, ToolError::FileNotFound(ref p) if p == "/docs/a.md"));

        let err: ToolError = TrackingError::encoding(Path::new("/docs/a.pdf"), "binary").into();
        assert!(matches!(err, ToolError::Encoding(_)));
        assert!(err.to_string().contains("/docs/a.pdf"));

        let err: ToolError = TrackingError::invalid_request("limit must be greater than 0").into();
        assert_eq!(
            err.to_string(),
            "Validation error: limit must be greater than 0"
        );
    }

    #[test]
    fn test_util_errors_map() {
        let err: ToolError =
            redline_util::Error::outside_root(Path::new("/etc/passwd"), Path::new("/docs")).into();
        assert!(matches!(err, ToolError::PermissionDenied(_)));

        let err: ToolError = redline_util::Error::invalid_input("empty").into();
        assert!(matches!(err, ToolError::Validation(_)));
    }
}
