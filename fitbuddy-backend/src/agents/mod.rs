//! Fitness agents: a coordinator that delegates to nutrition and training
//! specialists, all driven by the same bounded invocation runner.

pub mod coordinator;
pub mod definition;
pub mod error;
pub mod hub;
pub mod prompts;
pub mod runner;
pub mod specialist;
pub mod trace;

#[cfg(test)]
pub mod testing;

pub use error::AgentError;
pub use hub::AgentHub;
pub use trace::extract_tool_logs;
