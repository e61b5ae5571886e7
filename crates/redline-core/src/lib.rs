//! Configuration and session wiring for redline.
//!
//! This crate sits between the binary and the tool layer:
//! - Configuration management (multi-source, JSONC support)
//! - Instance setup: one baseline store, resolver and tool registry per
//!   running server

pub mod config;
pub mod error;
pub mod instance;

pub use config::Config;
pub use error::{ConfigError, CoreError, CoreResult};
pub use instance::Instance;
