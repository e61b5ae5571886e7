//! Command handlers for the redline CLI.

pub mod check;
pub mod config;
pub mod logging;
pub mod serve;

pub use check::*;
pub use config::*;
pub use logging::*;
pub use serve::*;
