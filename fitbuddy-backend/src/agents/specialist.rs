use super::definition::{AgentDefinition, RunnerConfig};
use super::error::AgentError;
use super::prompts::{NUTRITIONIST_PROMPT, TRAINER_PROMPT};
use crate::ai::GenerationEngine;
use crate::tools::builtin::{MaintenanceCaloriesTool, WorkoutPlanTool};
use crate::tools::{
    PropertySchema, Tool, ToolContext, ToolDefinition, ToolInputSchema, ToolRegistry, ToolResult,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub const NUTRITIONIST_ID: &str = "nutritionist";
pub const TRAINER_ID: &str = "trainer";

/// Nutrition specialist bound to the calorie estimator
pub fn nutritionist(
    engine: Arc<dyn GenerationEngine>,
    config: RunnerConfig,
) -> Result<AgentDefinition, AgentError> {
    let tools = ToolRegistry::new().with_tool(Arc::new(MaintenanceCaloriesTool::new()))?;
    Ok(AgentDefinition::new(
        NUTRITIONIST_ID,
        "Nutrition advice and maintenance calorie estimates",
        NUTRITIONIST_PROMPT,
        tools,
        engine,
        config,
    ))
}

/// Training specialist bound to the workout plan builder
pub fn trainer(
    engine: Arc<dyn GenerationEngine>,
    config: RunnerConfig,
) -> Result<AgentDefinition, AgentError> {
    let tools = ToolRegistry::new().with_tool(Arc::new(WorkoutPlanTool::new()))?;
    Ok(AgentDefinition::new(
        TRAINER_ID,
        "Workout plans and training routines",
        TRAINER_PROMPT,
        tools,
        engine,
        config,
    ))
}

/// Exposes a specialist agent as a tool taking a single free-text `query`.
///
/// Every call runs the specialist in a fresh conversation and returns only its
/// final answer; the nested history stays behind this boundary. Failures of
/// the nested run come back as error payloads so the caller's loop keeps going.
pub struct SpecialistTool {
    definition: ToolDefinition,
    agent: Arc<AgentDefinition>,
}

impl SpecialistTool {
    pub fn new(
        tool_name: impl Into<String>,
        description: impl Into<String>,
        agent: Arc<AgentDefinition>,
    ) -> Self {
        let input_schema = ToolInputSchema::default().property(
            "query",
            PropertySchema::string("The question to ask, kept as close to the user's wording as possible"),
            true,
        );

        SpecialistTool {
            definition: ToolDefinition {
                name: tool_name.into(),
                description: description.into(),
                input_schema,
            },
            agent,
        }
    }

    pub fn ask_nutritionist(agent: Arc<AgentDefinition>) -> Self {
        Self::new(
            "ask_nutritionist",
            "Ask the nutritionist about calories, diet, meals or macronutrients. Returns the nutritionist's answer.",
            agent,
        )
    }

    pub fn ask_trainer(agent: Arc<AgentDefinition>) -> Self {
        Self::new(
            "ask_trainer",
            "Ask the fitness trainer for a workout plan or training advice. Returns the trainer's answer.",
            agent,
        )
    }
}

#[async_trait]
impl Tool for SpecialistTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult {
        let query = params
            .get("query")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        log::info!(
            "[AGENTS] {} delegating to '{}' from invocation {} (depth {})",
            context.agent,
            self.agent.name(),
            context.invocation_id,
            context.depth + 1
        );

        match self
            .agent
            .invoke_with_history(Vec::new(), query, context.depth + 1)
            .await
        {
            Ok(invocation) if invocation.final_answer.trim().is_empty() => {
                log::warn!(
                    "[AGENTS] Specialist '{}' produced no answer (invocation {})",
                    self.agent.name(),
                    invocation.id
                );
                ToolResult::error(format!(
                    "Error: Specialist '{}' returned an empty answer",
                    self.agent.name()
                ))
            }
            Ok(invocation) => ToolResult::success(invocation.final_answer),
            Err(e) => {
                log::warn!("[AGENTS] Specialist '{}' failed: {}", self.agent.name(), e);
                ToolResult::error(format!("Error: {}", e))
            }
        }
    }
}
