//! Error handling utilities.
//!
//! This module provides a consistent error handling pattern for the
//! utility layer (path resolution and friends).

use std::fmt;
use std::path::Path;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for redline utilities.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid input or argument
    InvalidInput,
    /// IO operation failed
    Io,
    /// Not found
    NotFound,
    /// Permission denied
    PermissionDenied,
    /// Path escapes the documents root
    OutsideRoot,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with a source error.
    pub fn with_source<E>(kind: ErrorKind, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Create an error for a path that resolves outside the documents root.
    pub fn outside_root(path: &Path, root: &Path) -> Self {
        Self::new(
            ErrorKind::OutsideRoot,
            format!(
                "{} is outside the documents directory {}",
                path.display(),
                root.display()
            ),
        )
    }

    /// Map an IO error for `path` onto the matching error kind.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::Io,
        };
        let message = format!("{}: {}", path.display(), err);
        Self::with_source(kind, message, err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Io, err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("test error");
        assert_eq!(err.to_string(), "test error");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::with_source(ErrorKind::Io, "failed to read file", io_err);
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_from_io_maps_kind() {
        let path = Path::new("/docs/a.tex");
        let err = Error::from_io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().starts_with("/docs/a.tex"));

        let err = Error::from_io(
            path,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_outside_root() {
        let err = Error::outside_root(Path::new("/etc/passwd"), Path::new("/home/u/Documents"));
        assert_eq!(err.kind(), ErrorKind::OutsideRoot);
        assert!(err.to_string().contains("/etc/passwd"));
    }
}
