//! MCP server adapter (rmcp, stdio transport).
//!
//! Publishes one tool per catalog row with a JSON schema derived from the
//! row's parameters, and routes `tools/call` into the `Dispatcher`.
//!
//! Error mapping:
//!   unknown tool name   -> protocol error (invalid_params)
//!   any other failure   -> tool result with is_error = true, message as text
//!
use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
    JsonObject, ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde_json::{Value, json};
use tracing::info;

use crate::engine::catalog::{CATALOG, OperationSpec, ParamKind, ParameterSpec};
use crate::engine::{DispatchError, Dispatcher, ToolResult};

const INSTRUCTIONS: &str = "Tools wrap the Sui command-line client. Each call runs one \
`sui` subcommand and returns its output as text. Amounts and gas budgets are in MIST. \
Write operations (transfer, pay, split, merge, call, publish) submit real transactions \
on the active environment.";

#[derive(Clone)]
pub struct SuiServer {
    dispatcher: Arc<Dispatcher>,
}

impl SuiServer {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl ServerHandler for SuiServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request.arguments.unwrap_or_default();
        let outcome = self.dispatcher.dispatch(&request.name, &args).await;
        to_call_result(outcome)
    }
}

/// Serve on stdin/stdout until the client disconnects.
pub async fn serve_stdio(dispatcher: Arc<Dispatcher>) -> Result<()> {
    info!(tools = CATALOG.len(), "serving MCP on stdio");
    let service = SuiServer::new(dispatcher)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server on stdio")?;
    let reason = service
        .waiting()
        .await
        .context("MCP server task terminated abnormally")?;
    info!(?reason, "MCP session closed");
    Ok(())
}

/* ---- Tool Descriptors ---- */

pub fn tools() -> Vec<Tool> {
    CATALOG.iter().map(tool_for).collect()
}

pub fn tool_for(op: &'static OperationSpec) -> Tool {
    Tool::new(op.name, op.description, Arc::new(input_schema(op)))
}

/// JSON schema object for an operation's parameters.
pub fn input_schema(op: &OperationSpec) -> JsonObject {
    let mut properties = serde_json::Map::new();
    for p in op.params {
        properties.insert(p.name.to_string(), param_schema(p));
    }
    let required: Vec<Value> = op.required_params().map(|p| Value::from(p.name)).collect();

    let mut schema = JsonObject::new();
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), Value::Array(required));
    }
    schema
}

fn param_schema(p: &ParameterSpec) -> Value {
    let mut s = match p.kind {
        ParamKind::String => json!({"type": "string"}),
        ParamKind::Integer => json!({"type": "integer", "minimum": 0}),
        ParamKind::Boolean => json!({"type": "boolean"}),
        ParamKind::StringList => json!({"type": "array", "items": {"type": "string"}}),
        ParamKind::IntegerList => {
            json!({"type": "array", "items": {"type": "integer", "minimum": 0}})
        }
    };
    s["description"] = Value::from(p.description);
    if let Some(d) = p.default {
        s["default"] = Value::from(d);
    }
    s
}

/* ---- Result Mapping ---- */

pub fn to_call_result(
    outcome: Result<ToolResult, DispatchError>,
) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(ToolResult::Text(text)) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Ok(ToolResult::Structured { text, value }) => {
            let mut result = CallToolResult::success(vec![Content::text(text)]);
            result.structured_content = Some(value);
            Ok(result)
        }
        Err(DispatchError::UnknownOperation(name)) => Err(McpError::invalid_params(
            format!("unknown tool: {name}"),
            None,
        )),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::lookup;

    fn first_text(r: &CallToolResult) -> String {
        let v = serde_json::to_value(r).unwrap();
        v["content"][0]["text"].as_str().unwrap_or_default().to_string()
    }

    #[test]
    fn one_tool_per_operation() {
        let t = tools();
        assert_eq!(t.len(), CATALOG.len());
        assert!(t.iter().any(|t| t.name == "sui_split_coin"));
    }

    #[test]
    fn split_coin_schema() {
        let schema = Value::Object(input_schema(lookup("sui_split_coin").unwrap()));
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["coin_id", "amounts"]));
        assert_eq!(schema["properties"]["amounts"]["type"], "array");
        assert_eq!(schema["properties"]["amounts"]["items"]["type"], "integer");
        assert_eq!(schema["properties"]["gas_budget"]["type"], "integer");
    }

    #[test]
    fn schema_without_required() {
        let schema = input_schema(lookup("sui_balance").unwrap());
        assert!(!schema.contains_key("required"));
        let schema = Value::Object(input_schema(lookup("sui_keytool_generate").unwrap()));
        assert_eq!(schema["properties"]["key_scheme"]["default"], "ed25519");
    }

    #[test]
    fn text_result_is_success() {
        let r = to_call_result(Ok(ToolResult::Text("0xabc".into()))).unwrap();
        assert_ne!(r.is_error, Some(true));
        assert_eq!(first_text(&r), "0xabc");
        assert!(r.structured_content.is_none());
    }

    #[test]
    fn structured_result_keeps_raw_text() {
        let raw = "{\"a\": 1}".to_string();
        let r = to_call_result(Ok(ToolResult::Structured {
            text: raw.clone(),
            value: json!({"a": 1}),
        }))
        .unwrap();
        assert_eq!(first_text(&r), raw);
        assert_eq!(r.structured_content, Some(json!({"a": 1})));
    }

    #[test]
    fn execution_error_is_tool_error_with_stderr() {
        let r = to_call_result(Err(DispatchError::Execution {
            status: "exit status 1".into(),
            stderr: "insufficient gas".into(),
        }))
        .unwrap();
        assert_eq!(r.is_error, Some(true));
        assert!(first_text(&r).contains("insufficient gas"));
    }

    #[test]
    fn unknown_tool_is_protocol_error() {
        let err = to_call_result(Err(DispatchError::UnknownOperation("x".into()))).unwrap_err();
        assert!(err.message.contains("unknown tool: x"));
    }
}
