//! Model Context Protocol request dispatch.
//!
//! Transport-agnostic: the HTTP routes hand each decoded JSON-RPC request
//! to [`McpHandler::handle`] and deliver whatever it returns.

use crate::agent::json_rpc::{
    validate_request, JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS,
    METHOD_NOT_FOUND,
};
use crate::agent::tools::{
    get_prompt_definitions, get_tool_definitions, ToolCall, ToolError, ToolExecutor,
};
use crate::search::EventAggregator;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "festivalradar";

/// Dispatches MCP methods to the tool executor.
pub struct McpHandler {
    executor: ToolExecutor,
}

impl McpHandler {
    pub fn new(aggregator: Arc<EventAggregator>) -> Self {
        Self {
            executor: ToolExecutor::new(aggregator),
        }
    }

    /// Handle one request. Notifications yield `None`.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if let Err(e) = validate_request(&request) {
            return Some(JsonRpcResponse::error(request.id, e.code, e.message));
        }

        if request.is_notification() {
            debug!("MCP notification: {}", request.method);
            return None;
        }

        debug!("MCP request: {}", request.method);
        let id = request.id.clone();
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": get_tool_definitions() })),
            "prompts/list" => Ok(json!({ "prompts": get_prompt_definitions() })),
            "tools/call" => self.call_tool(request.params).await,
            "prompts/get" => self.get_prompt(request.params),
            other => Err((METHOD_NOT_FOUND, format!("Method not found: {}", other))),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err((code, message)) => JsonRpcResponse::error(id, code, message),
        })
    }

    fn initialize(&self) -> Value {
        info!("MCP client initialized");
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "prompts": { "listChanged": false }
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, (i32, String)> {
        let call = parse_call(params)?;
        let result = self.executor.execute(&call).await.map_err(tool_error)?;
        serde_json::to_value(result).map_err(|e| (INTERNAL_ERROR, e.to_string()))
    }

    fn get_prompt(&self, params: Option<Value>) -> Result<Value, (i32, String)> {
        let call = parse_call(params)?;
        self.executor.get_prompt(&call).map_err(tool_error)
    }
}

fn parse_call(params: Option<Value>) -> Result<ToolCall, (i32, String)> {
    let params = params.ok_or_else(|| (INVALID_PARAMS, "Missing params".to_string()))?;
    serde_json::from_value(params).map_err(|e| (INVALID_PARAMS, e.to_string()))
}

fn tool_error(err: ToolError) -> (i32, String) {
    let code = match err {
        ToolError::Encode(_) => INTERNAL_ERROR,
        _ => INVALID_PARAMS,
    };
    (code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::json_rpc::{JsonRpcId, INVALID_REQUEST};
    use crate::config::Config;

    fn handler() -> McpHandler {
        McpHandler::new(Arc::new(EventAggregator::new(&Config::default()).unwrap()))
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(JsonRpcId::Number(1)),
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = handler().handle(request("initialize", None)).await.unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "festivalradar");
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let mut notification = request("notifications/initialized", None);
        notification.id = None;
        assert!(handler().handle(notification).await.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = handler().handle(request("tools/list", None)).await.unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["tools"][0]["name"], "find_local_events");
    }

    #[tokio::test]
    async fn test_prompts_get() {
        let params = json!({
            "name": "generate_event_search_prompt",
            "arguments": {"city": "Montreal", "genre": "jazz"}
        });
        let response = handler()
            .handle(request("prompts/get", Some(params)))
            .await
            .unwrap();
        let text = response.result.unwrap()["messages"][0]["content"]["text"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(text.starts_with("Find jazz events in Montreal."));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = handler().handle(request("resources/list", None)).await.unwrap();
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tools_call_without_params() {
        let response = handler().handle(request("tools/call", None)).await.unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_call_missing_city() {
        let params = json!({"name": "find_local_events", "arguments": {}});
        let response = handler()
            .handle(request("tools/call", Some(params)))
            .await
            .unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("city"));
    }

    #[tokio::test]
    async fn test_bad_version() {
        let mut bad = request("ping", None);
        bad.jsonrpc = "1.0".to_string();
        let response = handler().handle(bad).await.unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(response.id, Some(JsonRpcId::Number(1)));
    }
}
