//! Shared utilities for redline.
//!
//! This crate provides common utilities used across the redline workspace:
//! - Error handling patterns
//! - Logging setup with tracing
//! - Document path resolution
//! - RAII-based timing for operation measurement

pub mod error;
pub mod log;
pub mod path;
pub mod timing;

pub use error::{Error, ErrorKind, Result};
pub use path::DocumentResolver;
pub use timing::TimingGuard;
