use super::definition::{AgentDefinition, RunnerConfig};
use super::error::AgentError;
use super::prompts::COORDINATOR_PROMPT;
use super::specialist::SpecialistTool;
use crate::ai::GenerationEngine;
use crate::tools::ToolRegistry;
use std::sync::Arc;

pub const COORDINATOR_ID: &str = "coordinator";
pub const COORDINATOR_ALIAS: &str = "mastermind";
pub const DEFAULT_COORDINATOR_ITERATIONS: usize = 5;

/// Build the coordinator whose only tools are the given specialists
pub fn coordinator(
    engine: Arc<dyn GenerationEngine>,
    config: RunnerConfig,
    specialists: Vec<SpecialistTool>,
) -> Result<AgentDefinition, AgentError> {
    let mut tools = ToolRegistry::new();
    for specialist in specialists {
        tools.register(Arc::new(specialist))?;
    }

    log::info!(
        "[AGENTS] Coordinator built with {} specialist(s), cap {}",
        tools.len(),
        config.max_iterations
    );

    Ok(AgentDefinition::new(
        COORDINATOR_ID,
        "Routes questions to the nutritionist and trainer and merges their answers",
        COORDINATOR_PROMPT,
        tools,
        engine,
        config,
    ))
}
