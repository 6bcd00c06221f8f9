//! Workout plan builder
//!
//! Produces a fixed text template per goal. The trainer is instructed to pass
//! the plan through unchanged, so the wording here is what users read.

use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolError, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

pub const TOOL_NAME: &str = "create_workout_plan";

const WARM_UP_REMINDER: &str = "- Always include warm-up and cool-down sessions.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    Maintenance,
}

impl FitnessGoal {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "weight_loss" => Some(FitnessGoal::WeightLoss),
            "muscle_gain" => Some(FitnessGoal::MuscleGain),
            "maintenance" => Some(FitnessGoal::Maintenance),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "Weight Loss",
            FitnessGoal::MuscleGain => "Muscle Gain",
            FitnessGoal::Maintenance => "Maintenance",
        }
    }

    fn focus(&self) -> [&'static str; 2] {
        match self {
            FitnessGoal::WeightLoss => [
                "- Focus on cardio and full-body workouts.",
                "- Include HIIT sessions 2-3 times a week.",
            ],
            FitnessGoal::MuscleGain => [
                "- Focus on strength training with compound movements.",
                "- Split routine targeting different muscle groups each day.",
            ],
            FitnessGoal::Maintenance => [
                "- Balanced mix of cardio and strength training.",
                "- Maintain current fitness level with varied workouts.",
            ],
        }
    }
}

pub fn build_workout_plan(goal: &str, days_per_week: u32) -> Result<String, ToolError> {
    let goal = FitnessGoal::from_str(goal).ok_or_else(|| {
        ToolError::Domain(
            "Goal must be 'weight_loss', 'muscle_gain', or 'maintenance'.".to_string(),
        )
    })?;
    if days_per_week == 0 {
        return Err(ToolError::Domain("days_per_week must be positive.".to_string()));
    }

    let mut plan = format!(
        "Workout Plan for {} ({} days/week):\n",
        goal.title(),
        days_per_week
    );
    for line in goal.focus() {
        plan.push_str(line);
        plan.push('\n');
    }
    plan.push_str(WARM_UP_REMINDER);
    plan.push('\n');

    Ok(plan)
}

/// Tool wrapper exposing the plan builder to the trainer
pub struct WorkoutPlanTool {
    definition: ToolDefinition,
}

impl WorkoutPlanTool {
    pub fn new() -> Self {
        let input_schema = ToolInputSchema::default()
            .property(
                "goal",
                PropertySchema::string("Fitness goal - 'weight_loss', 'muscle_gain', 'maintenance'"),
                true,
            )
            .property(
                "days_per_week",
                PropertySchema::integer("Number of days available for workouts per week")
                    .positive(),
                true,
            );

        WorkoutPlanTool {
            definition: ToolDefinition {
                name: TOOL_NAME.to_string(),
                description: "Creates a simple workout plan based on the user's goal and available days per week.".to_string(),
                input_schema,
            },
        }
    }
}

impl Default for WorkoutPlanTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct WorkoutPlanParams {
    goal: String,
    days_per_week: u32,
}

#[async_trait]
impl Tool for WorkoutPlanTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, _context: &ToolContext) -> ToolResult {
        let params: WorkoutPlanParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return ToolError::InvalidArguments {
                    tool: TOOL_NAME.to_string(),
                    reason: e.to_string(),
                }
                .into()
            }
        };

        match build_workout_plan(&params.goal, params.days_per_week) {
            Ok(plan) => ToolResult::success(plan),
            Err(e) => e.into(),
        }
    }
}
