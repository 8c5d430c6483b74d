//! Tool and prompt definitions exposed to orchestrating agents.
//!
//! The `find_local_events` tool runs the same aggregation as the HTTP
//! search endpoint and returns the same result shape.

use crate::models::SearchRequest;
use crate::search::{event_search_prompt, EventAggregator};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub const FIND_LOCAL_EVENTS: &str = "find_local_events";
pub const EVENT_SEARCH_PROMPT: &str = "generate_event_search_prompt";

/// Tool definition as listed by `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Prompt definition as listed by `prompts/list`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDefinition {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// A `tools/call` or `prompts/get` invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Arguments shared by the tool and the prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchArguments {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl SearchArguments {
    fn parse(arguments: &Value) -> Result<Self, ToolError> {
        if arguments.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(arguments.clone())
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))
    }

    fn into_request(self) -> Result<SearchRequest, ToolError> {
        let city = self
            .city
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("Missing required parameter: city".to_string())
            })?;
        Ok(SearchRequest::new(city, self.genre, self.start_date, self.end_date))
    }
}

/// Content block of a tool result.
#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

impl TextContent {
    pub fn text(text: String) -> Self {
        Self {
            content_type: "text",
            text,
        }
    }
}

/// Result of executing a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

/// Why a tool or prompt invocation was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Executes tool calls against the aggregator.
pub struct ToolExecutor {
    aggregator: Arc<EventAggregator>,
}

impl ToolExecutor {
    pub fn new(aggregator: Arc<EventAggregator>) -> Self {
        Self { aggregator }
    }

    /// Execute a tool call and return the result.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        debug!("Executing tool: {} with args: {:?}", call.name, call.arguments);

        match call.name.as_str() {
            FIND_LOCAL_EVENTS => self.find_local_events(&call.arguments).await,
            _ => Err(ToolError::UnknownTool(call.name.clone())),
        }
    }

    async fn find_local_events(&self, arguments: &Value) -> Result<ToolResult, ToolError> {
        let request = SearchArguments::parse(arguments)?.into_request()?;
        let response = self.aggregator.search(&request).await;

        Ok(ToolResult {
            content: vec![TextContent::text(serde_json::to_string(&response.records())?)],
            structured_content: Some(serde_json::to_value(&response)?),
            is_error: false,
        })
    }

    /// Render a prompt by name.
    pub fn get_prompt(&self, call: &ToolCall) -> Result<Value, ToolError> {
        if call.name != EVENT_SEARCH_PROMPT {
            return Err(ToolError::UnknownPrompt(call.name.clone()));
        }

        let args = SearchArguments::parse(&call.arguments)?;
        let text = event_search_prompt(
            args.city.as_deref(),
            args.genre.as_deref(),
            args.start_date.as_deref(),
            args.end_date.as_deref(),
        );

        Ok(json!({
            "description": "Natural language request for discovering local events",
            "messages": [
                {"role": "user", "content": {"type": "text", "text": text}}
            ]
        }))
    }
}

fn search_properties() -> Value {
    json!({
        "city": {"type": "string", "description": "City to search in"},
        "genre": {"type": "string", "description": "Genre or category filter, e.g. rock"},
        "start_date": {"type": "string", "description": "First day of the range, YYYY-MM-DD"},
        "end_date": {"type": "string", "description": "Last day of the range, YYYY-MM-DD"}
    })
}

/// Get the tool definitions.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: FIND_LOCAL_EVENTS.to_string(),
        description: "Find local events in a given city, filtered by genre and date range, \
                      from Ticketmaster and Eventbrite."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": search_properties(),
            "required": ["city"]
        }),
    }]
}

/// Get the prompt definitions.
pub fn get_prompt_definitions() -> Vec<PromptDefinition> {
    let argument = |name: &str, description: &str| PromptArgument {
        name: name.to_string(),
        description: description.to_string(),
        required: false,
    };

    vec![PromptDefinition {
        name: EVENT_SEARCH_PROMPT.to_string(),
        description: "Generate a natural language prompt for discovering local events.".to_string(),
        arguments: vec![
            argument("city", "City to search in"),
            argument("genre", "Genre or category filter"),
            argument("start_date", "First day of the range, YYYY-MM-DD"),
            argument("end_date", "Last day of the range, YYYY-MM-DD"),
        ],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn executor() -> ToolExecutor {
        ToolExecutor::new(Arc::new(EventAggregator::new(&Config::default()).unwrap()))
    }

    #[test]
    fn test_tool_definitions() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "find_local_events");
        assert_eq!(tools[0].input_schema["required"], json!(["city"]));

        let value = serde_json::to_value(&tools[0]).unwrap();
        assert!(value.get("inputSchema").is_some());
    }

    #[test]
    fn test_prompt_definitions() {
        let prompts = get_prompt_definitions();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].arguments.len(), 4);
        assert!(prompts[0].arguments.iter().all(|a| !a.required));
    }

    #[test]
    fn test_get_prompt() {
        let call = ToolCall {
            name: EVENT_SEARCH_PROMPT.to_string(),
            arguments: json!({"city": "Montreal", "start_date": "2024-07-01"}),
        };
        let prompt = executor().get_prompt(&call).unwrap();
        let text = prompt["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.contains("Montreal"));
        assert!(text.contains("after 2024-07-01"));
    }

    #[test]
    fn test_get_unknown_prompt() {
        let call = ToolCall {
            name: "nope".to_string(),
            arguments: Value::Null,
        };
        assert!(matches!(
            executor().get_prompt(&call),
            Err(ToolError::UnknownPrompt(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_city_is_rejected() {
        let call = ToolCall {
            name: FIND_LOCAL_EVENTS.to_string(),
            arguments: json!({"genre": "rock"}),
        };
        let err = executor().execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let call = ToolCall {
            name: "list_files".to_string(),
            arguments: json!({}),
        };
        assert!(matches!(
            executor().execute(&call).await,
            Err(ToolError::UnknownTool(_))
        ));
    }

    #[tokio::test]
    async fn test_find_local_events_reports_missing_key() {
        // No API keys: Ticketmaster fails before any network I/O, Eventbrite is skipped
        let call = ToolCall {
            name: FIND_LOCAL_EVENTS.to_string(),
            arguments: json!({"city": "Toronto"}),
        };
        let result = executor().execute(&call).await.unwrap();

        assert!(!result.is_error);
        let records: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(
            records,
            json!([{"source": "Ticketmaster", "error": "Ticketmaster API key is not configured"}])
        );
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["results"][0]["status"], "failure");
    }
}
