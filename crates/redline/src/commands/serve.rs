//! The `serve` command.

use redline_core::{Config, Instance};
use redline_mcp::{serve_stdio, McpServer};
use std::path::PathBuf;
use tracing::info;

/// Run the MCP server on stdin/stdout until the client closes stdin.
pub async fn run_serve(config: Config, sources: Vec<PathBuf>) -> anyhow::Result<()> {
    let instance = Instance::from_config(config, sources)?;
    for source in instance.sources() {
        info!(path = %source.display(), "Loaded config");
    }

    let server = McpServer::new(instance.registry(), instance.context().clone());
    serve_stdio(&server).await?;

    let tracked = instance.context().engine.store().len().await;
    info!(tracked, "MCP server stopped");
    Ok(())
}
