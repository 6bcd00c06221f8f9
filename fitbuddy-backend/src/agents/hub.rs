use super::coordinator::{self, COORDINATOR_ALIAS, COORDINATOR_ID};
use super::definition::{AgentDefinition, RunnerConfig};
use super::error::AgentError;
use super::runner::Invocation;
use super::specialist::{self, SpecialistTool};
use crate::ai::{GenerationEngine, Message, OpenAIClient};
use crate::config::Config;
use serde::Serialize;
use std::sync::Arc;

/// Iteration caps and timeouts for the two kinds of agent
#[derive(Debug, Clone, Copy)]
pub struct AgentSettings {
    pub coordinator: RunnerConfig,
    pub specialist: RunnerConfig,
}

impl Default for AgentSettings {
    fn default() -> Self {
        AgentSettings {
            coordinator: RunnerConfig::new(coordinator::DEFAULT_COORDINATOR_ITERATIONS, None),
            specialist: RunnerConfig::default(),
        }
    }
}

impl AgentSettings {
    pub fn from_config(config: &Config) -> Self {
        AgentSettings {
            coordinator: RunnerConfig::new(config.coordinator_max_iterations, config.engine_timeout()),
            specialist: RunnerConfig::new(config.specialist_max_iterations, config.engine_timeout()),
        }
    }
}

/// What a caller gets back from one top-level request
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    pub agent: String,
    pub answer: String,
    pub logs: Vec<String>,
    pub invocation_id: String,
    pub engine_turns: usize,
}

impl From<Invocation> for AgentReply {
    fn from(invocation: Invocation) -> Self {
        let logs = invocation.trace();
        AgentReply {
            agent: invocation.agent,
            answer: invocation.final_answer,
            logs,
            invocation_id: invocation.id,
            engine_turns: invocation.engine_turns,
        }
    }
}

/// The agents this process serves, built once at startup.
///
/// The coordinator is the default; specialists are also reachable directly.
pub struct AgentHub {
    agents: Vec<Arc<AgentDefinition>>,
}

impl AgentHub {
    /// Build the hub on an OpenAI-backed engine. Fails with `EngineUnavailable`
    /// when no credential is configured, before any engine call is made.
    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        let api_key = config.openai_api_key.as_deref().ok_or_else(|| {
            AgentError::EngineUnavailable("OPENAI_API_KEY is not set".to_string())
        })?;

        let client = OpenAIClient::new(
            api_key,
            config.openai_endpoint.as_deref(),
            Some(config.openai_model.as_str()),
            Some(config.temperature),
        )
        .map_err(|e| AgentError::EngineUnavailable(e.to_string()))?
        .with_max_retries(config.engine_max_retries);

        log::info!("[AGENTS] Using OpenAI model {}", client.model());
        Self::new(Arc::new(client), AgentSettings::from_config(config))
    }

    pub fn new(engine: Arc<dyn GenerationEngine>, settings: AgentSettings) -> Result<Self, AgentError> {
        let nutritionist = Arc::new(specialist::nutritionist(engine.clone(), settings.specialist)?);
        let trainer = Arc::new(specialist::trainer(engine.clone(), settings.specialist)?);

        let coordinator = Arc::new(coordinator::coordinator(
            engine,
            settings.coordinator,
            vec![
                SpecialistTool::ask_nutritionist(nutritionist.clone()),
                SpecialistTool::ask_trainer(trainer.clone()),
            ],
        )?);

        let hub = AgentHub {
            agents: vec![coordinator, nutritionist, trainer],
        };
        log::info!(
            "[AGENTS] Agent hub ready: {}",
            hub.agents.iter().map(|a| a.name()).collect::<Vec<_>>().join(", ")
        );
        Ok(hub)
    }

    pub fn agents(&self) -> &[Arc<AgentDefinition>] {
        &self.agents
    }

    /// Resolve an agent id case-insensitively; `None` or blank means the coordinator
    pub fn agent(&self, id: Option<&str>) -> Result<Arc<AgentDefinition>, AgentError> {
        let requested = id.map(str::trim).filter(|s| !s.is_empty());
        let key = match requested {
            None => COORDINATOR_ID.to_string(),
            Some(id) if id.eq_ignore_ascii_case(COORDINATOR_ALIAS) => COORDINATOR_ID.to_string(),
            Some(id) => id.to_lowercase(),
        };

        self.agents
            .iter()
            .find(|a| a.name() == key)
            .cloned()
            .ok_or_else(|| AgentError::UnknownAgent(requested.unwrap_or_default().to_string()))
    }

    pub async fn run_agent(&self, id: Option<&str>, query: &str) -> Result<AgentReply, AgentError> {
        self.run_agent_with_history(id, Vec::new(), query).await
    }

    /// Run one request after replaying earlier turns. Only plain user and
    /// assistant messages are replayed; anything else is dropped.
    pub async fn run_agent_with_history(
        &self,
        id: Option<&str>,
        history: Vec<Message>,
        query: &str,
    ) -> Result<AgentReply, AgentError> {
        let agent = self.agent(id)?;

        let replayed: Vec<Message> = history
            .into_iter()
            .filter(|m| matches!(m, Message::User { .. }) || m.is_final_answer())
            .collect();
        if !replayed.is_empty() {
            log::debug!("[AGENTS] Replaying {} prior turn(s) into '{}'", replayed.len(), agent.name());
        }

        let invocation = agent.invoke_with_history(replayed, query, 0).await?;
        Ok(invocation.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::RuleBasedEngine;
    use crate::agents::trace::extract_tool_logs;
    use crate::ai::{AiResponse, MockAiClient, ToolCall};
    use serde_json::json;

    const FULL_QUERY: &str = "I weigh 70kg, 175cm, 30 years old, male, moderate activity — \
        what are my maintenance calories, and give me a 4-day muscle gain plan";

    fn hub_with(engine: Arc<RuleBasedEngine>) -> AgentHub {
        AgentHub::new(engine, AgentSettings::default()).unwrap()
    }

    #[test]
    fn test_missing_credential_is_engine_unavailable() {
        let config = Config::from_lookup(|_| None);
        match AgentHub::from_config(&config) {
            Err(AgentError::EngineUnavailable(reason)) => assert!(reason.contains("OPENAI_API_KEY")),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("hub should not build without a credential"),
        }
    }

    #[test]
    fn test_agent_resolution() {
        let hub = hub_with(Arc::new(RuleBasedEngine::new()));

        assert_eq!(hub.agent(None).unwrap().name(), "coordinator");
        assert_eq!(hub.agent(Some("")).unwrap().name(), "coordinator");
        assert_eq!(hub.agent(Some("Mastermind")).unwrap().name(), "coordinator");
        assert_eq!(hub.agent(Some("TRAINER")).unwrap().name(), "trainer");
        assert_eq!(hub.agents().len(), 3);

        match hub.agent(Some("chef")) {
            Err(AgentError::UnknownAgent(id)) => assert_eq!(id, "chef"),
            other => panic!("unexpected: {:?}", other.map(|a| a.name().to_string())),
        }
    }

    #[test]
    fn test_coordinator_cap_defaults_to_five() {
        let hub = hub_with(Arc::new(RuleBasedEngine::new()));
        assert_eq!(hub.agent(None).unwrap().config().max_iterations, 5);
        assert_eq!(hub.agent(Some("nutritionist")).unwrap().config().max_iterations, 12);
    }

    #[tokio::test]
    async fn test_end_to_end_mixed_query() {
        let engine = Arc::new(RuleBasedEngine::new());
        let hub = hub_with(engine.clone());

        let reply = hub.run_agent(None, FULL_QUERY).await.unwrap();

        assert_eq!(reply.logs.len(), 2);
        assert!(reply.logs[0].contains("`ask_nutritionist`"));
        assert!(reply.logs[1].contains("`ask_trainer`"));
        assert!(reply.logs[0].contains("70kg"));

        assert!(reply.answer.contains("2555.56"), "answer: {}", reply.answer);
        assert!(reply.answer.contains("Muscle Gain (4 days/week)"));
        assert!(reply.answer.contains("compound movements"));
        assert!(reply.answer.contains("warm-up and cool-down"));

        assert_eq!(engine.calls_for("nutritionist"), 2);
        assert_eq!(engine.calls_for("trainer"), 2);
        assert_eq!(engine.calls_for("coordinator"), 3);
        assert_eq!(reply.engine_turns, 3);
    }

    #[tokio::test]
    async fn test_nutrition_only_query_runs_one_specialist() {
        let engine = Arc::new(RuleBasedEngine::new());
        let hub = hub_with(engine.clone());

        let reply = hub
            .run_agent(
                Some("mastermind"),
                "How many calories should a 25 year old female, 60 kg and 165 cm, eat? I am sedentary.",
            )
            .await
            .unwrap();

        assert_eq!(reply.logs.len(), 1);
        assert!(reply.logs[0].contains("`ask_nutritionist`"));
        assert!(reply.answer.contains("1614.3"));
        assert_eq!(engine.calls_for("trainer"), 0);
        assert_eq!(engine.calls_for("nutritionist"), 2);
    }

    #[tokio::test]
    async fn test_meal_plan_is_not_routed_to_trainer() {
        let engine = Arc::new(RuleBasedEngine::new());
        let hub = hub_with(engine.clone());

        let reply = hub
            .run_agent(None, "Can you suggest a meal plan for my diet?")
            .await
            .unwrap();

        assert_eq!(reply.logs.len(), 1);
        assert!(reply.logs[0].contains("`ask_nutritionist`"));
        assert_eq!(engine.calls_for("trainer"), 0);
    }

    #[tokio::test]
    async fn test_specialist_can_be_addressed_directly() {
        let engine = Arc::new(RuleBasedEngine::new());
        let hub = hub_with(engine.clone());

        let reply = hub
            .run_agent(Some("trainer"), "I want to lose weight, 3 days a week")
            .await
            .unwrap();

        assert_eq!(reply.agent, "trainer");
        assert_eq!(reply.logs.len(), 1);
        assert!(reply.logs[0].contains("`create_workout_plan`"));
        assert!(reply.answer.contains("HIIT"));
        assert_eq!(engine.calls(), vec!["trainer", "trainer"]);
    }

    #[tokio::test]
    async fn test_history_is_replayed_before_new_question() {
        let engine = Arc::new(MockAiClient::new(vec![Ok(AiResponse::text("Sure."))]));
        let hub = AgentHub::new(engine.clone(), AgentSettings::default()).unwrap();

        let history = vec![
            Message::user("Hi"),
            Message::assistant("Hello! How can I help?"),
            Message::system("ignored"),
            AiResponse::with_tools("", vec![ToolCall::new("c", "ask_trainer", json!({}))]).into(),
        ];
        hub.run_agent_with_history(None, history, "Thanks").await.unwrap();

        let trace = engine.trace();
        let seen = &trace[0].messages;
        assert_eq!(seen.len(), 4);
        assert!(matches!(seen[0], Message::System { .. }));
        assert_eq!(seen[1], Message::user("Hi"));
        assert_eq!(seen[2], Message::assistant("Hello! How can I help?"));
        assert_eq!(seen[3], Message::user("Thanks"));
    }

    #[tokio::test]
    async fn test_coordinator_cap_keeps_partial_trace() {
        let engine = Arc::new(MockAiClient::from_fn(|messages, tools| {
            // Coordinator keeps delegating; specialists answer immediately
            if tools.iter().any(|t| t.name == "ask_trainer") {
                let id = format!("c{}", messages.len());
                Ok(AiResponse::with_tools("", vec![ToolCall::new(id, "ask_trainer", json!({"query": "plan"}))]))
            } else {
                Ok(AiResponse::text("a plan"))
            }
        }));
        let hub = AgentHub::new(engine.clone(), AgentSettings::default()).unwrap();

        let err = hub.run_agent(None, "workout please").await.unwrap_err();
        let partial = err.partial_history().unwrap();
        assert_eq!(extract_tool_logs(partial).len(), 5);
        // 5 coordinator turns, 4 executed delegations
        assert_eq!(engine.call_count(), 9);
    }
}
