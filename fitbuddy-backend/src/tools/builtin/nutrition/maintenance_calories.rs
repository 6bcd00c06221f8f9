//! Maintenance calorie estimator
//!
//! Basal metabolic rate via the Mifflin-St Jeor equation, scaled by an
//! activity multiplier to estimate daily maintenance calories.

use crate::tools::registry::Tool;
use crate::tools::types::{
    PropertySchema, ToolContext, ToolDefinition, ToolError, ToolInputSchema, ToolResult,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const TOOL_NAME: &str = "calculate_maintenance_calories";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Case-insensitive parse; anything other than male/female is rejected
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            _ => None,
        }
    }

    /// Mifflin-St Jeor sex-specific constant
    fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    #[default]
    Moderate,
    /// Heavy exercise 6-7 days/week
    Active,
    /// Very heavy exercise, physical job
    VeryActive,
}

impl ActivityLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very_active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    /// Missing or unrecognized levels fall back to moderate
    pub fn parse_or_default(s: Option<&str>) -> Self {
        s.and_then(Self::from_str).unwrap_or_default()
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Result of a maintenance calorie estimate, echoing the normalized inputs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieEstimate {
    pub bmr: f64,
    pub maintenance_calories: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub activity_multiplier: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn estimate_maintenance_calories(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: &str,
    activity_level: Option<&str>,
) -> Result<CalorieEstimate, ToolError> {
    let sex = Sex::from_str(sex)
        .ok_or_else(|| ToolError::Domain("Sex must be 'male' or 'female'".to_string()))?;
    if !(weight_kg > 0.0) || !(height_cm > 0.0) || age == 0 {
        return Err(ToolError::Domain(
            "weight_kg, height_cm and age must be positive".to_string(),
        ));
    }

    let activity_level = ActivityLevel::parse_or_default(activity_level);
    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64 + sex.bmr_offset();
    let maintenance = bmr * activity_level.multiplier();

    Ok(CalorieEstimate {
        bmr: round2(bmr),
        maintenance_calories: round2(maintenance),
        weight_kg,
        height_cm,
        age,
        sex,
        activity_level,
        activity_multiplier: activity_level.multiplier(),
    })
}

/// Tool wrapper exposing the estimator to the nutritionist
pub struct MaintenanceCaloriesTool {
    definition: ToolDefinition,
}

impl MaintenanceCaloriesTool {
    pub fn new() -> Self {
        let input_schema = ToolInputSchema::default()
            .property(
                "weight_kg",
                PropertySchema::number("Weight in kilograms").positive(),
                true,
            )
            .property(
                "height_cm",
                PropertySchema::number("Height in centimeters").positive(),
                true,
            )
            .property("age", PropertySchema::integer("Age in years").positive(), true)
            .property("sex", PropertySchema::string("'male' or 'female'"), true)
            .property(
                "activity_level",
                PropertySchema::string(
                    "Activity level - 'sedentary', 'light', 'moderate', 'active', 'very_active'",
                )
                .with_default(json!("moderate")),
                false,
            );

        MaintenanceCaloriesTool {
            definition: ToolDefinition {
                name: TOOL_NAME.to_string(),
                description: "Calculates basal metabolic rate (BMR) and daily maintenance calories from weight, height, age, sex and activity level.".to_string(),
                input_schema,
            },
        }
    }
}

impl Default for MaintenanceCaloriesTool {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct MaintenanceCaloriesParams {
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: String,
    #[serde(default)]
    activity_level: Option<String>,
}

#[async_trait]
impl Tool for MaintenanceCaloriesTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    async fn execute(&self, params: Value, _context: &ToolContext) -> ToolResult {
        let params: MaintenanceCaloriesParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return ToolError::InvalidArguments {
                    tool: TOOL_NAME.to_string(),
                    reason: e.to_string(),
                }
                .into()
            }
        };

        match estimate_maintenance_calories(
            params.weight_kg,
            params.height_cm,
            params.age,
            &params.sex,
            params.activity_level.as_deref(),
        ) {
            Ok(estimate) => match serde_json::to_string(&estimate) {
                Ok(body) => ToolResult::success(body),
                Err(e) => ToolResult::error(json!({ "error": e.to_string() }).to_string()),
            },
            Err(ToolError::Domain(message)) => {
                ToolResult::error(json!({ "error": message }).to_string())
            }
            Err(other) => other.into(),
        }
    }
}
