//! Status tool - report whether a document changed since it was read.

use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use redline_util::TimingGuard;
use serde::Deserialize;
use serde_json::{json, Value};

/// Check a document against its baseline without touching it.
pub struct StatusTool;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusArgs {
    #[serde(alias = "file_path")]
    file_path: String,
}

#[async_trait]
impl Tool for StatusTool {
    fn id(&self) -> &str {
        "status"
    }

    fn description(&self) -> &str {
        r#"Checks whether a document changed since it was last read.

Reports one of: untracked (never read), unchanged, modified (with a diff of the changes), or missing (deleted since it was read). Never records a new baseline, so it is safe to call at any time."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "Document name or path"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let _timing = TimingGuard::tool(self.id());

        let args: StatusArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;
        let path = ctx.resolve(&args.file_path)?;

        let report = ctx.engine.status(&path).await?;
        let mut metadata = serde_json::to_value(&report)?;
        metadata["outcome"] = json!("status");

        Ok(
            ToolOutput::new(format!("Status {}", path.display()), report.render())
                .with_metadata(metadata),
        )
    }
}
