use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// AI API error with status code information
#[derive(Debug, Clone)]
pub struct AiError {
    /// Error message
    pub message: String,
    /// HTTP status code if available
    pub status_code: Option<u16>,
}

impl AiError {
    pub fn new(message: impl Into<String>) -> Self {
        AiError {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        AiError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Check if this is a client error (4xx status code)
    pub fn is_client_error(&self) -> bool {
        self.status_code.map(|c| (400..500).contains(&c)).unwrap_or(false)
    }

    /// Check if this is a server error (5xx status code)
    pub fn is_server_error(&self) -> bool {
        self.status_code.map(|c| c >= 500).unwrap_or(false)
    }

    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self.status_code, Some(429 | 502 | 503 | 504))
    }
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.status_code {
            write!(f, "[HTTP {}] {}", code, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for AiError {}

impl From<String> for AiError {
    fn from(s: String) -> Self {
        AiError::new(s)
    }
}

impl From<&str> for AiError {
    fn from(s: &str) -> Self {
        AiError::new(s)
    }
}

/// Represents a tool call made by the AI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Arguments to pass to the tool as JSON
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        ToolCall {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Represents the result of a tool execution to send back to the AI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// ID of the tool call this responds to
    pub tool_call_id: String,
    /// Content of the tool response
    pub content: String,
    /// Whether the tool execution resulted in an error
    pub is_error: bool,
}

impl ToolResponse {
    pub fn success(tool_call_id: String, content: String) -> Self {
        ToolResponse {
            tool_call_id,
            content,
            is_error: false,
        }
    }

    pub fn error(tool_call_id: String, error: String) -> Self {
        ToolResponse {
            tool_call_id,
            content: error,
            is_error: true,
        }
    }
}

/// Unified AI response that can contain both text and tool calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    /// Text content of the response (may be empty if only tool calls)
    pub content: String,
    /// Tool calls requested by the AI
    pub tool_calls: Vec<ToolCall>,
    /// The reason the AI stopped generating
    pub stop_reason: Option<String>,
}

impl AiResponse {
    pub fn text(content: impl Into<String>) -> Self {
        AiResponse {
            content: content.into(),
            tool_calls: vec![],
            stop_reason: Some("end_turn".to_string()),
        }
    }

    pub fn with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        AiResponse {
            content: content.into(),
            tool_calls,
            stop_reason: Some("tool_use".to_string()),
        }
    }

    /// Check if the response contains tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Per-call knobs forwarded to the engine alongside messages and tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Whether the engine may request several tool calls to run concurrently
    pub parallel_tool_calls: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            parallel_tool_calls: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_response_text() {
        let response = AiResponse::text("Hello world");
        assert_eq!(response.content, "Hello world");
        assert!(response.tool_calls.is_empty());
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_ai_response_with_tools() {
        let tool_call = ToolCall::new(
            "call_123",
            "calculate_maintenance_calories",
            serde_json::json!({"weight_kg": 70}),
        );
        let response = AiResponse::with_tools("", vec![tool_call]);

        assert!(response.has_tool_calls());
        assert_eq!(response.stop_reason.as_deref(), Some("tool_use"));
    }

    #[test]
    fn test_tool_response() {
        let success = ToolResponse::success("call_123".to_string(), "Result".to_string());
        assert!(!success.is_error);

        let error = ToolResponse::error("call_456".to_string(), "Failed".to_string());
        assert!(error.is_error);
    }

    #[test]
    fn test_error_classification() {
        assert!(AiError::with_status("rate limited", 429).is_retryable());
        assert!(AiError::with_status("rate limited", 429).is_client_error());
        assert!(AiError::with_status("bad gateway", 502).is_server_error());
        assert!(!AiError::with_status("unauthorized", 401).is_retryable());
        assert_eq!(AiError::with_status("boom", 500).to_string(), "[HTTP 500] boom");
        assert_eq!(AiError::new("offline").to_string(), "offline");
    }

    #[test]
    fn test_parallel_tool_calls_disabled_by_default() {
        assert!(!GenerationOptions::default().parallel_tool_calls);
    }
}
