//! Document tools for redline.
//!
//! This crate exposes the tracking engine as named tools with JSON
//! arguments, the shape the MCP server hands to clients:
//! - `read` loads a document and records its baseline
//! - `edit` replaces text, refusing if the document changed since the read
//! - `status` reports whether a document changed since the read

pub mod error;
pub mod registry;

// Tool implementations
pub mod edit;
pub mod read;
pub mod status;

pub use error::{ToolError, ToolResult};
pub use registry::ToolRegistry;

use async_trait::async_trait;
use redline_tracking::Engine;
use redline_util::DocumentResolver;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Context provided to tools during execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Session ID, used in logs.
    pub session_id: String,
    /// Maps user-supplied names to document identities.
    pub resolver: DocumentResolver,
    /// Shared baseline store and settings.
    pub engine: Engine,
}

impl ToolContext {
    /// Create a context over an engine.
    pub fn new(session_id: impl Into<String>, resolver: DocumentResolver, engine: Engine) -> Self {
        Self {
            session_id: session_id.into(),
            resolver,
            engine,
        }
    }

    /// Resolve a `filePath` argument to a document identity.
    pub fn resolve(&self, input: &str) -> ToolResult<PathBuf> {
        Ok(self.resolver.resolve(input)?)
    }
}

/// Result of tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Title/summary of the operation.
    pub title: String,
    /// Output text.
    pub output: String,
    /// Tool-specific metadata.
    pub metadata: Value,
}

impl ToolOutput {
    /// Create a new tool output.
    pub fn new(title: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            output: output.into(),
            metadata: Value::Null,
        }
    }

    /// Add metadata to the output.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// The `outcome` recorded in metadata, if any.
    pub fn outcome(&self) -> Option<&str> {
        self.metadata.get("outcome").and_then(Value::as_str)
    }

    /// Whether the tool ran but declined to do what was asked.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self.outcome(),
            Some("conflict" | "no_match" | "ambiguous_match")
        )
    }
}

/// The main trait for tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool ID.
    fn id(&self) -> &str;

    /// Get the tool description (for the client).
    fn description(&self) -> &str;

    /// Get the JSON Schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool.
    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput>;
}

/// A boxed tool for dynamic dispatch.
pub type BoxedTool = Arc<dyn Tool>;
