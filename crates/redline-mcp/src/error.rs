//! MCP error types.

use thiserror::Error;

/// Result type for MCP operations.
pub type McpResult<T> = Result<T, McpError>;

/// Errors that end a server session.
///
/// Problems with a single message (bad JSON, unknown method, failing tool)
/// are answered on the wire and never surface here.
#[derive(Debug, Error)]
pub enum McpError {
    /// IO error on the transport.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
