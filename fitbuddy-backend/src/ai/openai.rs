use crate::ai::types::{AiError, AiResponse, GenerationOptions, ToolCall};
use crate::ai::{GenerationEngine, Message};
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";

const BASE_DELAY_MS: u64 = 2000;

/// OpenAI chat-completions client with native tool calling
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    auth_headers: header::HeaderMap,
    endpoint: String,
    model: String,
    temperature: Option<f32>,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parallel_tool_calls: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: OpenAIFunctionCall,
}

/// Arguments travel as a JSON-encoded string on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIFunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Clone)]
struct OpenAITool {
    #[serde(rename = "type")]
    tool_type: String,
    function: OpenAIToolFunction,
}

#[derive(Debug, Serialize, Clone)]
struct OpenAIToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Deserialize)]
struct OpenAIChatResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorBody {
    message: String,
}

impl OpenAIClient {
    pub fn new(
        api_key: &str,
        endpoint: Option<&str>,
        model: Option<&str>,
        temperature: Option<f32>,
    ) -> Result<Self, AiError> {
        if api_key.trim().is_empty() {
            return Err(AiError::new("OpenAI API key is not configured"));
        }

        let mut auth_headers = header::HeaderMap::new();
        auth_headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let bearer = header::HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|e| AiError::new(format!("Invalid API key header: {}", e)))?;
        auth_headers.insert(header::AUTHORIZATION, bearer);

        Ok(Self {
            client: crate::http::shared_client().clone(),
            auth_headers,
            endpoint: endpoint.unwrap_or(DEFAULT_ENDPOINT).to_string(),
            model: model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(DEFAULT_MODEL)
                .to_string(),
            temperature,
            max_retries: 3,
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: GenerationOptions,
    ) -> OpenAIChatRequest {
        let api_tools: Vec<OpenAITool> = tools
            .iter()
            .map(|t| OpenAITool {
                tool_type: "function".to_string(),
                function: OpenAIToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: serde_json::to_value(&t.input_schema).unwrap_or_default(),
                },
            })
            .collect();

        let has_tools = !api_tools.is_empty();
        OpenAIChatRequest {
            model: self.model.clone(),
            messages: messages.iter().map(to_openai_message).collect(),
            temperature: self.temperature,
            tools: has_tools.then_some(api_tools),
            // The API rejects this flag when no tools are bound
            parallel_tool_calls: has_tools.then_some(options.parallel_tool_calls),
        }
    }

    async fn send_with_retries(&self, request: &OpenAIChatRequest) -> Result<OpenAIChatResponse, AiError> {
        let mut last_error: Option<AiError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay_ms = retry_delay_ms(attempt);
                log::warn!(
                    "[OPENAI] Retry attempt {}/{} after {}ms delay",
                    attempt,
                    self.max_retries,
                    delay_ms
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .headers(self.auth_headers.clone())
                .json(request)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("[OPENAI] Request failed (attempt {}): {}", attempt + 1, e);
                    last_error = Some(AiError::new(format!("OpenAI API request failed: {}", e)));
                    continue;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let error_text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OpenAIErrorResponse>(&error_text)
                    .map(|body| body.error.message)
                    .unwrap_or(error_text);
                let error = AiError::with_status(
                    format!("OpenAI API error: {}", message),
                    status.as_u16(),
                );

                if error.is_retryable() {
                    log::warn!(
                        "[OPENAI] Received retryable status {} (attempt {})",
                        status,
                        attempt + 1
                    );
                    last_error = Some(error);
                    continue;
                }
                if error.is_client_error() {
                    log::error!("[OPENAI] Request rejected with status {}: {}", status, error.message);
                } else if error.is_server_error() {
                    log::error!("[OPENAI] Server error {}: {}", status, error.message);
                }
                return Err(error);
            }

            return response
                .json::<OpenAIChatResponse>()
                .await
                .map_err(|e| AiError::new(format!("Failed to parse OpenAI response: {}", e)));
        }

        Err(last_error.unwrap_or_else(|| AiError::new("Max retries exceeded")))
    }
}

/// Exponential backoff before retry `attempt` (1-based), saturating on large attempts
fn retry_delay_ms(attempt: u32) -> u64 {
    let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
    BASE_DELAY_MS.saturating_mul(factor)
}

fn to_openai_message(message: &Message) -> OpenAIMessage {
    match message {
        Message::System { content } | Message::User { content } => OpenAIMessage {
            role: message.role().to_string(),
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: None,
        },
        Message::Assistant {
            content,
            tool_calls,
        } => {
            let calls: Vec<OpenAIToolCall> = tool_calls
                .iter()
                .map(|tc| OpenAIToolCall {
                    id: tc.id.clone(),
                    call_type: function_type(),
                    function: OpenAIFunctionCall {
                        name: tc.name.clone(),
                        arguments: tc.arguments.to_string(),
                    },
                })
                .collect();
            OpenAIMessage {
                role: "assistant".to_string(),
                content: if content.is_empty() && !calls.is_empty() {
                    None
                } else {
                    Some(content.clone())
                },
                tool_calls: (!calls.is_empty()).then_some(calls),
                tool_call_id: None,
            }
        }
        Message::Tool {
            tool_call_id,
            content,
            ..
        } => OpenAIMessage {
            role: "tool".to_string(),
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.clone()),
        },
    }
}

fn parse_arguments(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Default::default());
    }
    // Malformed JSON is passed through so schema validation can report it to the engine
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn parse_response(response: OpenAIChatResponse) -> Result<AiResponse, AiError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AiError::new("OpenAI API returned no choices"))?;

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall {
            id: call.id,
            name: call.function.name,
            arguments: parse_arguments(&call.function.arguments),
        })
        .collect();

    let stop_reason = if tool_calls.is_empty() {
        choice.finish_reason
    } else {
        Some("tool_use".to_string())
    };

    Ok(AiResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        stop_reason,
    })
}

#[async_trait]
impl GenerationEngine for OpenAIClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: GenerationOptions,
    ) -> Result<AiResponse, AiError> {
        let request = self.build_request(messages, tools, options);
        log::debug!(
            "[OPENAI] Sending request: model={} messages={} tools={}",
            request.model,
            request.messages.len(),
            tools.len()
        );

        let response = self.send_with_retries(&request).await?;
        parse_response(response)
    }
}
