//! Drop-based timing for tool calls and protocol requests.
//!
//! ```rust,ignore
//! let _timing = TimingGuard::tool("edit");
//! // logged when `_timing` goes out of scope
//! ```

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timed {
    /// A tool execution (`read`, `edit`, `status`).
    Tool,
    /// An MCP request, keyed by method.
    Request,
}

impl Timed {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timed::Tool => "tool",
            Timed::Request => "request",
        }
    }
}

/// How loudly a finished operation is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Loudness {
    Quiet,
    Noted,
    Slow,
}

/// Logs how long it lived when dropped.
///
/// Short operations go to `debug`, anything past `noted_after` to `info`,
/// and anything past `slow_after` to `warn`. Document I/O is usually a few
/// milliseconds, so a slow edit almost always means a slow filesystem.
pub struct TimingGuard {
    kind: Timed,
    name: String,
    start: Instant,
    noted_after: Duration,
    slow_after: Duration,
}

impl TimingGuard {
    pub fn new(kind: Timed, name: impl Into<String>) -> Self {
        let name = name.into();
        debug!(kind = kind.as_str(), name = %name, "Started");
        Self {
            kind,
            name,
            start: Instant::now(),
            noted_after: Duration::from_millis(100),
            slow_after: Duration::from_secs(2),
        }
    }

    /// Time a tool execution.
    pub fn tool(name: impl Into<String>) -> Self {
        Self::new(Timed::Tool, name)
    }

    /// Time a protocol request.
    pub fn request(method: impl Into<String>) -> Self {
        Self::new(Timed::Request, method)
    }

    /// Log at `info` once the operation takes at least `ms` milliseconds.
    pub fn with_info_threshold(mut self, ms: u64) -> Self {
        self.noted_after = Duration::from_millis(ms);
        self
    }

    /// Log at `warn` once the operation takes at least `ms` milliseconds.
    pub fn with_warn_threshold(mut self, ms: u64) -> Self {
        self.slow_after = Duration::from_millis(ms);
        self
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    fn loudness(&self, elapsed: Duration) -> Loudness {
        if elapsed >= self.slow_after {
            Loudness::Slow
        } else if elapsed >= self.noted_after {
            Loudness::Noted
        } else {
            Loudness::Quiet
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let ms = elapsed.as_millis() as u64;
        let kind = self.kind.as_str();

        match self.loudness(elapsed) {
            Loudness::Slow => warn!(kind, name = %self.name, ms, "Slow {kind} finished"),
            Loudness::Noted => info!(kind, name = %self.name, ms, "Finished"),
            Loudness::Quiet => debug!(kind, name = %self.name, ms, "Finished"),
        }
    }
}
