//! A full MCP conversation over an in-memory pipe.

use redline_mcp::{serve, McpServer};
use redline_test_utils::TestDocuments;
use redline_tools::{ToolContext, ToolRegistry};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::BufReader;

async fn converse(docs: &TestDocuments, messages: &[Value], between: impl Fn(usize)) -> Vec<Value> {
    let ctx = ToolContext::new("stdio-test", docs.resolver(), docs.engine());
    let server = McpServer::new(Arc::new(ToolRegistry::with_builtins()), ctx);

    let mut responses = Vec::new();
    for (i, message) in messages.iter().enumerate() {
        between(i);
        let input = format!("{message}\n");
        let mut output = Vec::new();
        serve(&server, BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();
        for line in String::from_utf8(output).unwrap().lines() {
            responses.push(serde_json::from_str(line).unwrap());
        }
    }
    responses
}

fn call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
}

#[tokio::test]
async fn handshake_and_conflict_flow() {
    let docs = TestDocuments::new()
        .with_file("draft.md", "Hello World\n")
        .build();

    let messages = vec![
        json!({ "jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test", "version": "0" }
        }}),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        call(1, "read", json!({ "filePath": "draft.md" })),
        call(
            2,
            "edit",
            json!({ "filePath": "draft.md", "oldString": "Hello World", "newString": "Hello CUPS" }),
        ),
        call(3, "status", json!({ "filePath": "draft.md" })),
    ];

    let responses = converse(&docs, &messages, |i| {
        // An external editor rewrites the file after the read.
        if i == 3 {
            docs.write("draft.md", "Hello Universe\n");
        }
    })
    .await;

    // The notification gets no response.
    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["id"], 0);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "redline");

    assert_eq!(responses[1]["result"]["isError"], false);

    let edit = &responses[2]["result"];
    assert_eq!(edit["isError"], true);
    assert_eq!(edit["_meta"]["outcome"], "conflict");
    let text = edit["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("-Hello World"));
    assert!(text.contains("+Hello Universe"));

    assert_eq!(responses[3]["result"]["_meta"]["state"], "modified");
    assert_eq!(docs.read("draft.md"), "Hello Universe\n");
}

#[tokio::test]
async fn blank_lines_are_skipped_and_bad_json_answered() {
    let docs = TestDocuments::new().build();
    let ctx = ToolContext::new("stdio-test", docs.resolver(), docs.engine());
    let server = McpServer::new(Arc::new(ToolRegistry::with_builtins()), ctx);

    let input = "\n\n{oops\n{\"jsonrpc\":\"2.0\",\"id\":\"p\",\"method\":\"ping\"}\n";
    let mut output = Vec::new();
    serve(&server, BufReader::new(input.as_bytes()), &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"]["code"], -32700);
    assert_eq!(lines[0]["id"], Value::Null);
    assert_eq!(lines[1]["id"], "p");
    assert_eq!(lines[1]["result"], json!({}));
}
