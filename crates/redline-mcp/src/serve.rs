//! Line-delimited JSON-RPC transport.
//!
//! Each line on the input is one message; each response is written as one
//! line and flushed. Requests are answered in the order they arrive.

use crate::{McpResult, McpServer};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Serve requests from `reader` until it reaches end of input.
pub async fn serve<R, W>(server: &McpServer, reader: R, mut writer: W) -> McpResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        handled += 1;
        if let Some(response) = server.handle_message(line).await {
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }
    }

    debug!(messages = handled, "Input closed");
    Ok(())
}

/// Serve on the process's stdin and stdout.
pub async fn serve_stdio(server: &McpServer) -> McpResult<()> {
    info!(
        documents = %server.context().resolver.root().display(),
        "MCP server listening on stdio"
    );
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(server, stdin, stdout).await
}
