//! Scripted generation engine for tests
//!
//! Replays queued responses (or a responder function) and records every
//! request it receives so tests can assert on what the engine saw.

use crate::ai::types::{AiError, AiResponse, GenerationOptions};
use crate::ai::{GenerationEngine, Message};
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

type Responder =
    Box<dyn Fn(&[Message], &[ToolDefinition]) -> Result<AiResponse, AiError> + Send + Sync>;

/// One engine call as observed by the mock
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
    pub options: GenerationOptions,
}

impl TraceEntry {
    /// System prompt the calling agent sent, if any
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages.iter().find_map(|m| match m {
            Message::System { content } => Some(content.as_str()),
            _ => None,
        })
    }
}

pub struct MockAiClient {
    responses: Mutex<VecDeque<Result<AiResponse, AiError>>>,
    responder: Option<Responder>,
    delay: Option<Duration>,
    trace: Mutex<Vec<TraceEntry>>,
}

impl MockAiClient {
    pub fn new(responses: Vec<Result<AiResponse, AiError>>) -> Self {
        MockAiClient {
            responses: Mutex::new(responses.into()),
            responder: None,
            delay: None,
            trace: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call by running `responder` over the request
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&[Message], &[ToolDefinition]) -> Result<AiResponse, AiError> + Send + Sync + 'static,
    {
        MockAiClient {
            responses: Mutex::new(VecDeque::new()),
            responder: Some(Box::new(responder)),
            delay: None,
            trace: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn trace(&self) -> Vec<TraceEntry> {
        self.trace.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.trace.lock().len()
    }
}

#[async_trait]
impl GenerationEngine for MockAiClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        options: GenerationOptions,
    ) -> Result<AiResponse, AiError> {
        self.trace.lock().push(TraceEntry {
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
            options,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.responses.lock().pop_front();
        match scripted {
            Some(response) => response,
            None => match &self.responder {
                Some(responder) => responder(messages, tools),
                None => Err(AiError::new("MockAiClient has no scripted response left")),
            },
        }
    }
}
