//! Model Context Protocol (MCP) server for redline.
//!
//! Exposes the document tools to MCP clients over stdio: one JSON-RPC
//! message per line on stdin, one response per line on stdout.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐   JSON-RPC / stdio   ┌──────────────────┐
//! │   MCP client    │ ◄──────────────────► │    McpServer     │
//! └─────────────────┘                      └──────────────────┘
//!                                                   │
//!                                                   ▼
//!                                          ┌──────────────────┐
//!                                          │   ToolRegistry   │
//!                                          │(read/edit/status)│
//!                                          └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use redline_mcp::{serve_stdio, McpServer};
//! use redline_tools::{ToolContext, ToolRegistry};
//! use redline_util::DocumentResolver;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ToolContext::new(
//!     "session",
//!     DocumentResolver::new("/home/user/Documents"),
//!     Default::default(),
//! );
//! let server = McpServer::new(Arc::new(ToolRegistry::with_builtins()), ctx);
//! serve_stdio(&server).await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod protocol;
pub mod serve;
mod server;

pub use error::{McpError, McpResult};
pub use protocol::{JsonRpcRequest, JsonRpcResponse, McpTool, ToolCallResult, ToolContent};
pub use serve::{serve, serve_stdio};
pub use server::McpServer;
