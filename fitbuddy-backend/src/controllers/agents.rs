use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;

use crate::agents::coordinator::COORDINATOR_ID;
use crate::AppState;

#[derive(Serialize)]
pub struct AgentInfo {
    pub id: String,
    pub description: String,
    pub tools: Vec<String>,
    pub max_iterations: usize,
    pub is_default: bool,
}

#[derive(Serialize)]
pub struct AgentListResponse {
    pub success: bool,
    pub agents: Vec<AgentInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/agents").route(web::get().to(list_agents)));
}

async fn list_agents(state: web::Data<AppState>) -> impl Responder {
    let hub = match &state.hub {
        Ok(hub) => hub,
        Err(e) => {
            return HttpResponse::ServiceUnavailable().json(AgentListResponse {
                success: false,
                agents: vec![],
                error: Some(e.to_string()),
            });
        }
    };

    let agents = hub
        .agents()
        .iter()
        .map(|agent| AgentInfo {
            id: agent.name().to_string(),
            description: agent.description().to_string(),
            tools: agent
                .tool_definitions()
                .iter()
                .map(|t| t.name.clone())
                .collect(),
            max_iterations: agent.config().max_iterations,
            is_default: agent.name() == COORDINATOR_ID,
        })
        .collect();

    HttpResponse::Ok().json(AgentListResponse {
        success: true,
        agents,
        error: None,
    })
}
