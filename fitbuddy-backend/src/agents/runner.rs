use super::definition::AgentDefinition;
use super::error::AgentError;
use super::trace::extract_tool_logs;
use crate::ai::{Message, ToolCall, ToolResponse};
use crate::tools::ToolContext;
use std::time::Instant;
use uuid::Uuid;

/// Where an invocation currently is in its loop
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationState {
    /// Waiting for the engine to produce the next assistant turn
    AwaitingEngine,
    /// The last assistant turn asked for these tools, in request order
    ExecutingTools(Vec<ToolCall>),
    Done,
    Aborted,
}

/// A completed invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    pub id: String,
    pub agent: String,
    pub messages: Vec<Message>,
    pub final_answer: String,
    pub engine_turns: usize,
}

impl Invocation {
    /// One log line per tool call made during this invocation
    pub fn trace(&self) -> Vec<String> {
        extract_tool_logs(&self.messages)
    }
}

/// Text of the most recent assistant message that requests no tools.
/// Empty when the history has none.
pub fn final_answer(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.is_final_answer())
        .map(|m| m.content().to_string())
        .unwrap_or_default()
}

/// Drives one agent's bounded engine/tool loop over a single conversation.
pub struct InvocationRunner<'a> {
    agent: &'a AgentDefinition,
    id: String,
    depth: usize,
    messages: Vec<Message>,
    state: InvocationState,
    engine_turns: usize,
}

impl<'a> InvocationRunner<'a> {
    /// `messages` holds any replayed turns plus the new user message. The
    /// agent's system prompt is prepended when no system message is present.
    pub fn new(agent: &'a AgentDefinition, mut messages: Vec<Message>, depth: usize) -> Self {
        if !messages.iter().any(|m| matches!(m, Message::System { .. })) {
            messages.insert(0, Message::system(agent.system_prompt()));
        }

        InvocationRunner {
            agent,
            id: Uuid::new_v4().to_string(),
            depth,
            messages,
            state: InvocationState::AwaitingEngine,
            engine_turns: 0,
        }
    }

    pub async fn run(mut self) -> Result<Invocation, AgentError> {
        let start = Instant::now();
        let limit = self.agent.config().max_iterations;
        log::info!(
            "[RUNNER] Starting invocation {} for agent '{}' (depth {}, cap {})",
            self.id,
            self.agent.name(),
            self.depth,
            limit
        );

        loop {
            match std::mem::replace(&mut self.state, InvocationState::AwaitingEngine) {
                InvocationState::AwaitingEngine => {
                    if self.engine_turns >= limit {
                        self.state = InvocationState::Aborted;
                        continue;
                    }
                    self.engine_turns += 1;

                    let response = match self.agent.call_engine(&self.messages).await {
                        Ok(r) => r,
                        Err(e) => {
                            log::error!(
                                "[RUNNER] Invocation {} failed on engine turn {}: {}",
                                self.id,
                                self.engine_turns,
                                e
                            );
                            return Err(e);
                        }
                    };

                    let calls = response.tool_calls.clone();
                    self.messages.push(response.into());

                    if calls.is_empty() {
                        self.state = InvocationState::Done;
                    } else if self.engine_turns >= limit {
                        // The cap is spent and the engine still wants tools; nothing left to answer them with
                        self.state = InvocationState::Aborted;
                    } else {
                        log::debug!(
                            "[RUNNER] Invocation {} turn {} requested {} tool call(s)",
                            self.id,
                            self.engine_turns,
                            calls.len()
                        );
                        self.state = InvocationState::ExecutingTools(calls);
                    }
                }
                InvocationState::ExecutingTools(calls) => {
                    self.execute_tools(calls).await;
                    self.state = InvocationState::AwaitingEngine;
                }
                InvocationState::Done => {
                    self.state = InvocationState::Done;
                    let answer = final_answer(&self.messages);
                    log::info!(
                        "[RUNNER] Invocation {} for '{}' finished in {} engine turn(s), {}ms",
                        self.id,
                        self.agent.name(),
                        self.engine_turns,
                        start.elapsed().as_millis()
                    );
                    return Ok(Invocation {
                        id: self.id,
                        agent: self.agent.name().to_string(),
                        messages: self.messages,
                        final_answer: answer,
                        engine_turns: self.engine_turns,
                    });
                }
                InvocationState::Aborted => {
                    self.state = InvocationState::Aborted;
                    log::warn!(
                        "[RUNNER] Invocation {} for '{}' aborted after {} engine turn(s), {}ms",
                        self.id,
                        self.agent.name(),
                        self.engine_turns,
                        start.elapsed().as_millis()
                    );
                    return Err(AgentError::RecursionLimitExceeded {
                        agent: self.agent.name().to_string(),
                        limit,
                        messages: self.messages,
                    });
                }
            }
        }
    }

    async fn execute_tools(&mut self, calls: Vec<ToolCall>) {
        let context = ToolContext::new(self.agent.name(), self.id.clone(), self.depth);

        for call in calls {
            let result = self
                .agent
                .tools()
                .execute(&call.name, call.arguments.clone(), &context)
                .await;

            let response = if result.success {
                ToolResponse::success(call.id, result.content)
            } else {
                ToolResponse::error(call.id, result.content)
            };
            self.messages.push(Message::tool_result(response));
        }
    }
}
