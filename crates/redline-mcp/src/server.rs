//! Request dispatch.

use crate::protocol::{
    codes, CallToolParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, ListToolsResult,
    McpTool, ServerCapabilities, ServerInfo, ToolCallResult, ToolsCapability, PROTOCOL_VERSION,
};
use redline_tools::{ToolContext, ToolRegistry};
use redline_util::TimingGuard;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

const INSTRUCTIONS: &str = "Read a document before editing it. If an edit is refused because \
the document changed, the refusal shows what changed; read the document again and retry.";

/// An MCP server over a tool registry.
///
/// Holds no per-connection state besides the tool context, so one server
/// can answer any number of requests in any order.
pub struct McpServer {
    name: String,
    version: String,
    registry: Arc<ToolRegistry>,
    context: ToolContext,
}

impl McpServer {
    /// Create a server named after this crate.
    pub fn new(registry: Arc<ToolRegistry>, context: ToolContext) -> Self {
        Self {
            name: "redline".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            registry,
            context,
        }
    }

    /// Override the name and version reported on initialize.
    pub fn with_info(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.name = name.into();
        self.version = version.into();
        self
    }

    /// The tool context shared by every call.
    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Handle one raw message.
    ///
    /// Returns `None` for notifications.
    pub async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Unparseable MCP message");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    codes::PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                id,
                codes::INVALID_REQUEST,
                format!("Invalid request: {e}"),
            )),
        }
    }

    /// Handle a parsed request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "Handling MCP request");

        let Some(id) = request.id else {
            match request.method.as_str() {
                "notifications/initialized" => debug!("Client initialized"),
                "notifications/cancelled" => debug!("Client cancelled a request"),
                other => debug!(method = %other, "Ignoring notification"),
            }
            return None;
        };

        let _timing = TimingGuard::request(request.method.as_str());
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            _ => JsonRpcResponse::error(id, codes::METHOD_NOT_FOUND, "Method not found"),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        info!(name = %self.name, version = %self.version, "Initializing MCP server");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        };

        to_response(id, &result)
    }

    fn handle_list_tools(&self, id: Value) -> JsonRpcResponse {
        let tools: Vec<McpTool> = self
            .registry
            .all()
            .into_iter()
            .map(|tool| McpTool {
                name: tool.id().to_string(),
                description: Some(tool.description().to_string()),
                input_schema: Some(tool.parameters_schema()),
            })
            .collect();
        debug!(count = tools.len(), "Listing MCP tools");

        to_response(id, &ListToolsResult { tools })
    }

    async fn handle_call_tool(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params.map(serde_json::from_value::<CallToolParams>) {
            Some(Ok(params)) => params,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid params: {e}"),
                );
            }
            None => return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing params"),
        };

        let Some(tool) = self.registry.get(&params.name) else {
            return JsonRpcResponse::error(
                id,
                codes::INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            );
        };

        let args = params
            .arguments
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        let result = match tool.execute(args, &self.context).await {
            Ok(output) => {
                let refused = output.is_refusal();
                if refused {
                    debug!(tool = %params.name, outcome = ?output.outcome(), "Tool refused");
                }
                let mut result = ToolCallResult::text(output.output, refused);
                if !output.metadata.is_null() {
                    result.meta = Some(output.metadata);
                }
                result
            }
            Err(e) => {
                warn!(tool = %params.name, error = %e, "Tool failed");
                ToolCallResult::text(e.to_string(), true)
            }
        };

        to_response(id, &result)
    }
}

fn to_response<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, codes::INTERNAL_ERROR, format!("Internal error: {e}")),
    }
}
