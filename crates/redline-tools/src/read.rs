//! Read tool - read a document and record its baseline.

use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use redline_tracking::ReadRequest;
use redline_util::TimingGuard;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Read a document with line numbers.
pub struct ReadTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadArgs {
    #[serde(alias = "file_path")]
    file_path: String,
    #[serde(default)]
    offset: Option<usize>,
    #[serde(default)]
    limit: Option<usize>,
}

#[async_trait]
impl Tool for ReadTool {
    fn id(&self) -> &str {
        "read"
    }

    fn description(&self) -> &str {
        r#"Reads a document with line numbers, in `cat -n` format.

Usage:
- filePath may be a bare name (draft.tex), a path relative to the documents directory, or an absolute path
- offset is the 1-based first line (default 1); limit is the number of lines (default 50)
- Reading a document records it as the version you are working from. Edits are refused if the document changes after this point, so read again before editing when that happens."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "Document name or path"
                },
                "offset": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "The line number to start reading from (1-based, default 1)"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "The number of lines to read (default 50)"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let _timing = TimingGuard::tool(self.id());

        let args: ReadArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;
        let path = ctx.resolve(&args.file_path)?;
        debug!(session = %ctx.session_id, path = %path.display(), "read");

        let request = ReadRequest {
            offset: args.offset.unwrap_or(1),
            limit: args.limit,
        };
        let view = ctx.engine.read(&path, request).await?;

        let output = if view.is_empty() {
            let limit = args.limit.unwrap_or(ctx.engine.settings().read_limit);
            format!(
                "No content in range (lines {}-{}). The document has {} lines.",
                view.offset,
                view.offset.saturating_add(limit).saturating_sub(1),
                view.total_lines
            )
        } else {
            let mut output = view.render();
            let last = view.lines.last().map(|l| l.number).unwrap_or(0);
            if last < view.total_lines {
                output.push_str(&format!(
                    "\n\n(Showing lines {}-{} of {}. Use offset={} to read more.)",
                    view.offset,
                    last,
                    view.total_lines,
                    last + 1
                ));
            }
            output
        };

        Ok(ToolOutput::new(format!("Read {}", path.display()), output).with_metadata(json!({
            "outcome": "read",
            "path": path.display().to_string(),
            "offset": view.offset,
            "lines": view.lines.len(),
            "totalLines": view.total_lines,
            "size": view.size,
            "hash": view.content_hash.to_hex(),
        })))
    }
}
