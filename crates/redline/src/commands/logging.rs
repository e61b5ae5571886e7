//! Logging initialization.
//!
//! stdout belongs to the MCP protocol, so logs go to stderr unless a log
//! file is requested.

use redline_util::log::{self, LogConfig, LogLevel, LogTarget};
use std::path::PathBuf;

/// Where `--log-file` sends output.
///
/// `None` means stderr, `Some(None)` the default log file, and
/// `Some(Some(path))` an explicit file.
pub fn log_target(file: Option<Option<PathBuf>>) -> LogTarget {
    match file {
        None => LogTarget::Stderr,
        Some(Some(path)) => LogTarget::File(path),
        Some(None) => match log::default_log_path() {
            Some(path) => LogTarget::File(path),
            None => LogTarget::Stderr,
        },
    }
}

/// Initialize logging. Returns the log file path if logging to a file.
pub fn init_logging(level: LogLevel, target: LogTarget) -> Option<PathBuf> {
    log::init(LogConfig {
        target,
        level,
        include_location: level == LogLevel::Trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_by_default() {
        assert_eq!(log_target(None), LogTarget::Stderr);
    }

    #[test]
    fn test_explicit_file() {
        let path = PathBuf::from("/tmp/redline-test.log");
        assert_eq!(
            log_target(Some(Some(path.clone()))),
            LogTarget::File(path)
        );
    }

    #[test]
    fn test_default_file_is_named_after_redline() {
        if let LogTarget::File(path) = log_target(Some(None)) {
            assert!(path.ends_with("redline/logs/redline.log"));
        }
    }
}
