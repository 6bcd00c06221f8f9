use crate::ai::{AiError, Message};
use crate::tools::ToolError;
use std::fmt;
use std::time::Duration;

/// Failures that end an agent invocation
#[derive(Debug, Clone)]
pub enum AgentError {
    /// The invocation used up its engine turns while still asking for tools.
    /// Carries the history so far so a trace can still be extracted.
    RecursionLimitExceeded {
        agent: String,
        limit: usize,
        messages: Vec<Message>,
    },
    /// The generation engine returned an error
    Engine { agent: String, source: AiError },
    /// A single engine call ran past the configured timeout
    EngineTimeout { agent: String, timeout: Duration },
    /// No engine could be built (e.g. missing credential)
    EngineUnavailable(String),
    /// The requested agent id is not registered
    UnknownAgent(String),
    EmptyQuery,
    /// An agent was assembled with a conflicting tool set
    InvalidToolSet(ToolError),
}

impl AgentError {
    /// History captured before an aborted invocation stopped
    pub fn partial_history(&self) -> Option<&[Message]> {
        match self {
            AgentError::RecursionLimitExceeded { messages, .. } => Some(messages),
            _ => None,
        }
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentError::RecursionLimitExceeded { agent, limit, .. } => write!(
                f,
                "Agent '{}' exceeded its limit of {} engine turns without producing an answer",
                agent, limit
            ),
            AgentError::Engine { agent, source } => {
                write!(f, "Generation engine failed for agent '{}': {}", agent, source)
            }
            AgentError::EngineTimeout { agent, timeout } => write!(
                f,
                "Generation engine timed out after {}s for agent '{}'",
                timeout.as_secs_f64(),
                agent
            ),
            AgentError::EngineUnavailable(reason) => {
                write!(f, "Generation engine unavailable: {}", reason)
            }
            AgentError::UnknownAgent(id) => write!(f, "Unknown agent '{}'", id),
            AgentError::EmptyQuery => write!(f, "Query must not be empty"),
            AgentError::InvalidToolSet(e) => write!(f, "Invalid tool set: {}", e),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentError::Engine { source, .. } => Some(source),
            AgentError::InvalidToolSet(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ToolError> for AgentError {
    fn from(e: ToolError) -> Self {
        AgentError::InvalidToolSet(e)
    }
}
