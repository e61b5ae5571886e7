//! Logging setup using tracing.
//!
//! This module provides consistent logging configuration across redline.
//! The MCP server speaks its protocol on stdout, so log output goes to
//! stderr or to a file, never to stdout.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a log level from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Where formatted log lines go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogTarget {
    /// Discard output (spans and filters still apply).
    #[default]
    None,
    /// Write to stderr.
    Stderr,
    /// Append to a file.
    File(PathBuf),
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Where to write logs.
    pub target: LogTarget,
    /// Log level.
    pub level: LogLevel,
    /// Whether to include file/line info in logs.
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            target: LogTarget::None,
            level: LogLevel::Info,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Build the filter directive for the redline crates at the configured level.
    pub fn directive(&self) -> String {
        let level = self.level.as_str();
        [
            "redline",
            "redline_core",
            "redline_tracking",
            "redline_tools",
            "redline_mcp",
        ]
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
    }
}

/// Initialize logging with the given configuration.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over the configured level. Returns the log file path when
/// logging to a file.
pub fn init(config: LogConfig) -> Option<PathBuf> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let subscriber = tracing_subscriber::registry().with(filter);

    match config.target {
        LogTarget::Stderr => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location);

            let _ = subscriber.with(fmt_layer).try_init();
            None
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("Warning: Could not create log directory: {e}");
                    return None;
                }
            }

            let file = match std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
            {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file: {e}");
                    return None;
                }
            };

            let fmt_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_file(config.include_location)
                .with_line_number(config.include_location);

            let _ = subscriber.with(fmt_layer).try_init();
            Some(path)
        }
        LogTarget::None => {
            let _ = subscriber.try_init();
            None
        }
    }
}

/// Get the default log file path.
pub fn default_log_path() -> Option<PathBuf> {
    crate::path::logs_dir().map(|dir| dir.join("redline.log"))
}
