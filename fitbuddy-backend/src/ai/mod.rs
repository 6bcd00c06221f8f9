pub mod openai;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use openai::OpenAIClient;
pub use types::{AiError, AiResponse, GenerationOptions, ToolCall, ToolResponse};

#[cfg(test)]
pub use mock::MockAiClient;

use crate::tools::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::Tool => "tool",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One unit of conversation, tagged by the role that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    /// Engine output. Pending tool calls make it an intermediate step, never a final answer.
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    pub fn tool_result(response: ToolResponse) -> Self {
        Message::Tool {
            tool_call_id: response.tool_call_id,
            content: response.content,
            is_error: response.is_error,
        }
    }

    pub fn role(&self) -> MessageRole {
        match self {
            Message::System { .. } => MessageRole::System,
            Message::User { .. } => MessageRole::User,
            Message::Assistant { .. } => MessageRole::Assistant,
            Message::Tool { .. } => MessageRole::Tool,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System { content }
            | Message::User { content }
            | Message::Assistant { content, .. }
            | Message::Tool { content, .. } => content,
        }
    }

    /// Tool calls still waiting for results (empty for every role but assistant)
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        match self {
            Message::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    /// An assistant message with no pending tool calls
    pub fn is_final_answer(&self) -> bool {
        matches!(self, Message::Assistant { tool_calls, .. } if tool_calls.is_empty())
    }
}

impl From<AiResponse> for Message {
    fn from(response: AiResponse) -> Self {
        Message::Assistant {
            content: response.content,
            tool_calls: response.tool_calls,
        }
    }
}

/// The language-generation capability the agents reason with.
///
/// Given the conversation so far and the tools an agent may call, an engine
/// returns one assistant turn: either plain text or a request to run tools.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    /// Short provider label used in logs
    fn name(&self) -> &str;

    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: GenerationOptions,
    ) -> Result<AiResponse, AiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_serializes_with_role_tag() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));

        let value = serde_json::to_value(Message::Tool {
            tool_call_id: "call_1".to_string(),
            content: "42".to_string(),
            is_error: false,
        })
        .unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_1");
    }

    #[test]
    fn test_assistant_without_calls_is_final() {
        assert!(Message::assistant("done").is_final_answer());

        let pending: Message = AiResponse::with_tools(
            "",
            vec![ToolCall::new("call_1", "create_workout_plan", json!({}))],
        )
        .into();
        assert!(!pending.is_final_answer());
        assert_eq!(pending.pending_tool_calls().len(), 1);
        assert!(!Message::user("question").is_final_answer());
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Message::system("s").role().to_string(), "system");
        assert_eq!(Message::assistant("a").role(), MessageRole::Assistant);
        assert_eq!(Message::user("u").content(), "u");
    }
}
