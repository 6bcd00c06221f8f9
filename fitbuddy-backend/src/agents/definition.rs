use super::error::AgentError;
use super::runner::{Invocation, InvocationRunner};
use crate::ai::{AiResponse, GenerationEngine, GenerationOptions, Message};
use crate::tools::{ToolDefinition, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_ITERATIONS: usize = 12;

/// Bounds applied to every invocation of one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Maximum engine turns per invocation
    pub max_iterations: usize,
    /// Timeout for a single engine call
    pub engine_timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            engine_timeout: None,
        }
    }
}

impl RunnerConfig {
    pub fn new(max_iterations: usize, engine_timeout: Option<Duration>) -> Self {
        RunnerConfig {
            max_iterations,
            engine_timeout,
        }
    }
}

/// An agent: instruction prompt + bound tools + shared engine handle.
///
/// Built once at startup and shared behind `Arc`; nothing here changes after
/// construction, so concurrent requests read it without locking.
pub struct AgentDefinition {
    name: String,
    description: String,
    system_prompt: String,
    tools: ToolRegistry,
    tool_definitions: Vec<ToolDefinition>,
    engine: Arc<dyn GenerationEngine>,
    config: RunnerConfig,
}

impl AgentDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        system_prompt: impl Into<String>,
        tools: ToolRegistry,
        engine: Arc<dyn GenerationEngine>,
        config: RunnerConfig,
    ) -> Self {
        let tool_definitions = tools.definitions();
        AgentDefinition {
            name: name.into(),
            description: description.into(),
            system_prompt: system_prompt.into(),
            tools,
            tool_definitions,
            engine,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn tool_definitions(&self) -> &[ToolDefinition] {
        &self.tool_definitions
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Answer a single question in a fresh conversation
    pub async fn invoke(&self, query: &str) -> Result<Invocation, AgentError> {
        self.invoke_with_history(Vec::new(), query, 0).await
    }

    /// Answer `query` after replaying earlier turns.
    ///
    /// `depth` is 0 for a top-level request and grows by one for each nested
    /// specialist call.
    pub async fn invoke_with_history(
        &self,
        history: Vec<Message>,
        query: &str,
        depth: usize,
    ) -> Result<Invocation, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        let mut messages = history;
        messages.push(Message::user(query));
        InvocationRunner::new(self, messages, depth).run().await
    }

    /// One engine turn over the current conversation with this agent's tools bound
    pub(crate) async fn call_engine(&self, messages: &[Message]) -> Result<AiResponse, AgentError> {
        let options = GenerationOptions {
            parallel_tool_calls: false,
        };
        let call = self
            .engine
            .generate(messages, &self.tool_definitions, options);

        let result = match self.config.engine_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                AgentError::EngineTimeout {
                    agent: self.name.clone(),
                    timeout,
                }
            })?,
            None => call.await,
        };

        result.map_err(|source| AgentError::Engine {
            agent: self.name.clone(),
            source,
        })
    }
}

impl std::fmt::Debug for AgentDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentDefinition")
            .field("name", &self.name)
            .field("engine", &self.engine.name())
            .field("tools", &self.tool_definitions.iter().map(|t| &t.name).collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}
