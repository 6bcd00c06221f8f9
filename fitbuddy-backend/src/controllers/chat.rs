use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::agents::{extract_tool_logs, AgentError};
use crate::ai::Message;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Agent id; the coordinator when omitted
    #[serde(default)]
    pub agent: Option<String>,
    pub message: String,
    /// Earlier turns of this conversation, oldest first
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// One line per tool call the answering agent made
    pub logs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    pub completed_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    fn failed(error: &AgentError) -> Self {
        ChatResponse {
            success: false,
            answer: None,
            logs: error.partial_history().map(extract_tool_logs).unwrap_or_default(),
            invocation_id: None,
            completed_at: chrono::Utc::now().to_rfc3339(),
            error: Some(error.to_string()),
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/chat").route(web::post().to(chat)));
}

fn error_status(error: &AgentError) -> StatusCode {
    match error {
        AgentError::UnknownAgent(_) | AgentError::EmptyQuery => StatusCode::BAD_REQUEST,
        AgentError::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AgentError::EngineTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        AgentError::Engine { .. } => StatusCode::BAD_GATEWAY,
        AgentError::RecursionLimitExceeded { .. } | AgentError::InvalidToolSet(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn to_history(turns: &[ChatMessage]) -> Vec<Message> {
    turns
        .iter()
        .filter_map(|turn| match turn.role.to_lowercase().as_str() {
            "user" => Some(Message::user(turn.content.clone())),
            "assistant" => Some(Message::assistant(turn.content.clone())),
            other => {
                log::warn!("[CHAT] Ignoring history turn with role '{}'", other);
                None
            }
        })
        .collect()
}

async fn chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> impl Responder {
    let hub = match &state.hub {
        Ok(hub) => hub.clone(),
        Err(e) => {
            log::warn!("[CHAT] Rejecting request, engine unavailable: {}", e);
            return HttpResponse::build(error_status(e)).json(ChatResponse::failed(e));
        }
    };

    let request = body.into_inner();
    log::info!(
        "[CHAT] Request for agent '{}' ({} history turn(s))",
        request.agent.as_deref().unwrap_or("default"),
        request.history.len()
    );

    match hub
        .run_agent_with_history(
            request.agent.as_deref(),
            to_history(&request.history),
            &request.message,
        )
        .await
    {
        Ok(reply) => {
            log::info!(
                "[CHAT] Invocation {} answered by '{}' with {} tool call(s)",
                reply.invocation_id,
                reply.agent,
                reply.logs.len()
            );
            HttpResponse::Ok().json(ChatResponse {
                success: true,
                answer: Some(reply.answer),
                logs: reply.logs,
                invocation_id: Some(reply.invocation_id),
                completed_at: chrono::Utc::now().to_rfc3339(),
                error: None,
            })
        }
        Err(e) => {
            log::error!("[CHAT] Request failed: {}", e);
            HttpResponse::build(error_status(&e)).json(ChatResponse::failed(&e))
        }
    }
}
