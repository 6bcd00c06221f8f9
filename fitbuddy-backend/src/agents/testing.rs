//! Deterministic stand-in for the generation engine
//!
//! Plays all three roles by recognising the system prompt it is given, so the
//! whole coordinator -> specialist -> tool chain can run without a network.

use super::prompts::{COORDINATOR_PROMPT, NUTRITIONIST_PROMPT, TRAINER_PROMPT};
use crate::ai::{AiError, AiResponse, GenerationEngine, GenerationOptions, Message, ToolCall};
use crate::tools::ToolDefinition;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

#[derive(Default)]
pub struct RuleBasedEngine {
    calls: Mutex<Vec<String>>,
}

impl RuleBasedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Role served by each engine call, in order ("coordinator", "nutritionist", "trainer")
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn calls_for(&self, role: &str) -> usize {
        self.calls.lock().iter().filter(|r| r.as_str() == role).count()
    }
}

/// Messages after the most recent user message, plus that message's text
fn current_turn(messages: &[Message]) -> (String, &[Message]) {
    match messages
        .iter()
        .rposition(|m| matches!(m, Message::User { .. }))
    {
        Some(pos) => (messages[pos].content().to_string(), &messages[pos + 1..]),
        None => (String::new(), &[]),
    }
}

fn tool_results(turn: &[Message]) -> Vec<&str> {
    turn.iter()
        .filter(|m| matches!(m, Message::Tool { .. }))
        .map(|m| m.content())
        .collect()
}

fn issued_calls(turn: &[Message]) -> usize {
    turn.iter().map(|m| m.pending_tool_calls().len()).sum()
}

fn call(turn: &[Message], name: &str, arguments: Value) -> AiResponse {
    let id = format!("call_{}_{}", name, issued_calls(turn) + 1);
    AiResponse::with_tools("", vec![ToolCall::new(id, name, arguments)])
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '.' || c == '_'))
        .map(|w| w.trim_matches('.').to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// A number written either glued to `unit` ("70kg") or followed by it ("70 kg")
fn number_with_unit(words: &[String], units: &[&str]) -> Option<f64> {
    for (i, word) in words.iter().enumerate() {
        for unit in units {
            if let Some(n) = word.strip_suffix(unit).and_then(|n| n.parse().ok()) {
                return Some(n);
            }
            if word.as_str() == *unit {
                if let Some(n) = i.checked_sub(1).and_then(|p| words[p].parse().ok()) {
                    return Some(n);
                }
            }
        }
    }
    None
}

fn mentions(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn wants_nutrition(question: &str) -> bool {
    mentions(question, &["calorie", "diet", "nutrition", "meal", "macro", "protein"])
}

fn wants_training(question: &str) -> bool {
    // "meal plan" is a nutrition request, any other plan is a training one
    let question = question.to_lowercase().replace("meal plan", "");
    mentions(
        &question,
        &["workout", "training", "exercise", "routine", "muscle gain", "plan"],
    )
}

fn coordinator_turn(messages: &[Message]) -> AiResponse {
    let (question, turn) = current_turn(messages);

    let mut needed = Vec::new();
    if wants_nutrition(&question) {
        needed.push("ask_nutritionist");
    }
    if wants_training(&question) {
        needed.push("ask_trainer");
    }

    if needed.is_empty() {
        return AiResponse::text("I can help with nutrition and training questions.");
    }

    let issued = issued_calls(turn);
    if issued < needed.len() {
        return call(turn, needed[issued], json!({ "query": question }));
    }

    AiResponse::text(tool_results(turn).join("\n\n"))
}

fn nutritionist_turn(messages: &[Message]) -> AiResponse {
    let (question, turn) = current_turn(messages);

    if let Some(result) = tool_results(turn).last() {
        return match serde_json::from_str::<Value>(result) {
            Ok(v) if v.get("maintenance_calories").is_some() => AiResponse::text(format!(
                "Your BMR is {} kcal and your maintenance calories are {} kcal per day.",
                v["bmr"], v["maintenance_calories"]
            )),
            _ => AiResponse::text(format!("I could not calculate that: {}", result)),
        };
    }

    let w = words(&question);
    let weight = number_with_unit(&w, &["kg"]);
    let height = number_with_unit(&w, &["cm"]);
    let age = number_with_unit(&w, &["years", "year"]);
    let sex = if w.iter().any(|x| x == "female" || x == "woman") {
        Some("female")
    } else if w.iter().any(|x| x == "male" || x == "man") {
        Some("male")
    } else {
        None
    };
    let activity = ["sedentary", "light", "moderate", "active", "very_active"]
        .into_iter()
        .find(|a| w.iter().any(|x| x.starts_with(a)));

    match (weight, height, age, sex) {
        (Some(weight), Some(height), Some(age), Some(sex)) => {
            let mut args = json!({
                "weight_kg": weight,
                "height_cm": height,
                "age": age,
                "sex": sex,
            });
            if let Some(activity) = activity {
                args["activity_level"] = json!(activity);
            }
            call(turn, "calculate_maintenance_calories", args)
        }
        _ => AiResponse::text(
            "Please tell me your weight (kg), height (cm), age and sex so I can calculate your calories.",
        ),
    }
}

fn trainer_turn(messages: &[Message]) -> AiResponse {
    let (question, turn) = current_turn(messages);

    if let Some(result) = tool_results(turn).last() {
        return AiResponse::text(result.to_string());
    }

    let goal = if mentions(&question, &["muscle", "bulk"]) {
        "muscle_gain"
    } else if mentions(&question, &["lose", "weight loss", "fat"]) {
        "weight_loss"
    } else {
        "maintenance"
    };
    let days = number_with_unit(&words(&question), &["day", "days"]).unwrap_or(3.0);

    call(
        turn,
        "create_workout_plan",
        json!({ "goal": goal, "days_per_week": days as u64 }),
    )
}

#[async_trait]
impl GenerationEngine for RuleBasedEngine {
    fn name(&self) -> &str {
        "rule-based"
    }

    async fn generate(
        &self,
        messages: &[Message],
        _tools: &[ToolDefinition],
        _options: GenerationOptions,
    ) -> Result<AiResponse, AiError> {
        let prompt = messages
            .iter()
            .find(|m| matches!(m, Message::System { .. }))
            .map(|m| m.content())
            .unwrap_or_default();

        let (role, response) = if prompt == COORDINATOR_PROMPT {
            ("coordinator", coordinator_turn(messages))
        } else if prompt == NUTRITIONIST_PROMPT {
            ("nutritionist", nutritionist_turn(messages))
        } else if prompt == TRAINER_PROMPT {
            ("trainer", trainer_turn(messages))
        } else {
            return Err(AiError::new("RuleBasedEngine: unrecognised system prompt"));
        };

        self.calls.lock().push(role.to_string());
        Ok(response)
    }
}
