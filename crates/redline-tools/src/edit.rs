//! Edit tool - exact string replacement guarded by change detection.
//!
//! The edit only goes through when the document on disk is still the
//! version that was last read (or written) through these tools. Otherwise
//! the caller gets the external changes as a diff and nothing is written.

use crate::{Tool, ToolContext, ToolError, ToolOutput, ToolResult};
use async_trait::async_trait;
use redline_tracking::{EditOutcome, EditRequest};
use redline_util::TimingGuard;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Edit tool for string replacement.
pub struct EditTool;

fn default_expected() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditArgs {
    #[serde(alias = "file_path")]
    file_path: String,
    #[serde(alias = "old_string")]
    old_string: String,
    #[serde(alias = "new_string")]
    new_string: String,
    #[serde(alias = "expected_replacements", default = "default_expected")]
    expected_replacements: usize,
}

#[async_trait]
impl Tool for EditTool {
    fn id(&self) -> &str {
        "edit"
    }

    fn description(&self) -> &str {
        r#"Performs exact string replacements in a document.

Usage:
- Read the document first. The edit is refused if the document has not been read, or if it changed on disk since it was last read; the refusal shows the external changes as a diff.
- The edit will FAIL if `oldString` is not found in the document.
- The edit will FAIL if `oldString` occurs a different number of times than `expectedReplacements` (default 1).
- Consecutive edits do not need a read in between."#
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["filePath", "oldString", "newString"],
            "properties": {
                "filePath": {
                    "type": "string",
                    "description": "Document name or path"
                },
                "oldString": {
                    "type": "string",
                    "description": "The exact text to replace"
                },
                "newString": {
                    "type": "string",
                    "description": "The text to replace it with"
                },
                "expectedReplacements": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Number of occurrences expected (default 1)"
                }
            }
        })
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> ToolResult<ToolOutput> {
        let _timing = TimingGuard::tool(self.id());

        let args: EditArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::validation(format!("Invalid arguments: {e}")))?;
        let path = ctx.resolve(&args.file_path)?;
        debug!(session = %ctx.session_id, path = %path.display(), "edit");

        let request = EditRequest::new(args.old_string, args.new_string)
            .expecting(args.expected_replacements);
        let old_string = request.old_string.clone();
        let outcome = ctx.engine.edit(&path, request).await?;
        let title = format!("Edit {}", path.display());
        let path_str = path.display().to_string();

        let output = match outcome {
            EditOutcome::Success(done) => ToolOutput::new(
                title,
                format!(
                    "Successfully replaced {} occurrence(s) in {}\n\n{}",
                    done.replacements, path_str, done.snippet
                ),
            )
            .with_metadata(json!({
                "outcome": "success",
                "path": path_str,
                "replacements": done.replacements,
                "additions": done.additions,
                "deletions": done.deletions,
                "diff": done.diff,
                "hash": done.content_hash.to_hex(),
            })),

            EditOutcome::Conflict(conflict) => {
                ToolOutput::new(title, conflict.message()).with_metadata(json!({
                    "outcome": "conflict",
                    "reason": conflict.reason.as_str(),
                    "path": path_str,
                    "diff": conflict.diff,
                }))
            }

            EditOutcome::NoMatch => ToolOutput::new(
                title,
                format!("String not found in {}: {:?}", path_str, old_string),
            )
            .with_metadata(json!({
                "outcome": "no_match",
                "path": path_str,
            })),

            EditOutcome::AmbiguousMatch { found, expected } => ToolOutput::new(
                title,
                format!(
                    "Expected {} replacement(s), but found {} occurrence(s) in {}. \
                     Add surrounding context to oldString, or set expectedReplacements to {}.",
                    expected, found, path_str, found
                ),
            )
            .with_metadata(json!({
                "outcome": "ambiguous_match",
                "path": path_str,
                "found": found,
                "expected": expected,
            })),
        };

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::ReadTool;
    use redline_test_utils::TestDocuments;

    fn context(docs: &TestDocuments) -> ToolContext {
        ToolContext::new("test", docs.resolver(), docs.engine())
    }

    async fn read(ctx: &ToolContext, name: &str) -> ToolOutput {
        ReadTool
            .execute(json!({ "filePath": name }), ctx)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_simple_edit() {
        let docs = TestDocuments::new().with_file("b.tex", "alpha beta").build();
        let ctx = context(&docs);
        read(&ctx, "b.tex").await;

        let result = EditTool
            .execute(
                json!({
                    "filePath": "b.tex",
                    "oldString": "beta",
                    "newString": "gamma"
                }),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(docs.read("b.tex"), "alpha gamma");
        assert_eq!(result.outcome(), Some("success"));
        assert_eq!(result.metadata["replacements"], 1);
        assert!(result.output.contains("     1\talpha gamma"));
        assert!(result.metadata["diff"]
            .as_str()
            .unwrap()
            .contains("+alpha gamma"));
    }

    #[tokio::test]
    async fn test_snake_case_arguments() {
        let docs = TestDocuments::new().with_file("a.md", "X X X").build();
        let ctx = context(&docs);
        read(&ctx, "a.md").await;

        let result = EditTool
            .execute(
                json!({
                    "file_path": "a.md",
                    "old_string": "X",
                    "new_string": "Y",
                    "expected_replacements": 3
                }),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result.outcome(), Some("success"));
        assert_eq!(docs.read("a.md"), "Y Y Y");
    }

    #[tokio::test]
    async fn test_edit_without_read_is_refused() {
        let docs = TestDocuments::new().with_file("a.md", "hello").build();
        let ctx = context(&docs);

        let result = EditTool
            .execute(
                json!({ "filePath": "a.md", "oldString": "hello", "newString": "bye" }),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result.outcome(), Some("conflict"));
        assert_eq!(result.metadata["reason"], "not_read");
        assert!(result.is_refusal());
        assert_eq!(docs.read("a.md"), "hello");
    }

    #[tokio::test]
    async fn test_external_change_is_refused_with_diff() {
        let docs = TestDocuments::new()
            .with_file("draft.md", "Hello World\n")
            .build();
        let ctx = context(&docs);
        read(&ctx, "draft.md").await;
        docs.write("draft.md", "Hello Universe\n");

        let result = EditTool
            .execute(
                json!({
                    "filePath": "draft.md",
                    "oldString": "Hello World",
                    "newString": "Hello CUPS"
                }),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(result.outcome(), Some("conflict"));
        assert_eq!(result.metadata["reason"], "modified_externally");
        assert!(result.output.contains("-Hello World"));
        assert!(result.output.contains("+Hello Universe"));
        assert!(result.output.contains("(last read)"));
        assert_eq!(docs.read("draft.md"), "Hello Universe\n");
    }

    #[tokio::test]
    async fn test_ambiguous_match_message() {
        let docs = TestDocuments::new().with_file("a.md", "cat and cat").build();
        let ctx = context(&docs);
        read(&ctx, "a.md").await;

        let result = EditTool
            .execute(
                json!({ "filePath": "a.md", "oldString": "cat", "newString": "dog" }),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result.outcome(), Some("ambiguous_match"));
        assert_eq!(result.metadata["found"], 2);
        assert!(result.output.contains("found 2 occurrence(s)"));
        assert_eq!(docs.read("a.md"), "cat and cat");
    }

    #[tokio::test]
    async fn test_no_match_message() {
        let docs = TestDocuments::new().with_file("a.md", "hello world").build();
        let ctx = context(&docs);
        read(&ctx, "a.md").await;

        let result = EditTool
            .execute(
                json!({ "filePath": "a.md", "oldString": "nonexistent", "newString": "x" }),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(result.outcome(), Some("no_match"));
        assert!(result.output.contains("\"nonexistent\""));
    }

    #[tokio::test]
    async fn test_same_strings_is_validation_error() {
        let docs = TestDocuments::new().with_file("a.md", "same").build();
        let ctx = context(&docs);
        read(&ctx, "a.md").await;

        let err = EditTool
            .execute(
                json!({ "filePath": "a.md", "oldString": "same", "newString": "same" }),
                &ctx,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[tokio::test]
    async fn test_deleted_file_is_not_found() {
        let docs = TestDocuments::new().with_file("a.md", "text").build();
        let ctx = context(&docs);
        read(&ctx, "a.md").await;
        docs.remove("a.md");

        let err = EditTool
            .execute(
                json!({ "filePath": "a.md", "oldString": "text", "newString": "other" }),
                &ctx,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::FileNotFound(_)));
    }
}
