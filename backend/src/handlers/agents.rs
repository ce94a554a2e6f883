//! HTTP handlers for agent registration

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::CreateAgentInput;
use crate::services::AgentService;
use crate::AppState;

/// Response for a created agent
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentResponse {
    pub message: String,
    pub agent_id: i64,
}

/// Create an agent with its bank accounts
pub async fn create_agent(
    State(state): State<AppState>,
    Json(input): Json<CreateAgentInput>,
) -> AppResult<(StatusCode, Json<CreateAgentResponse>)> {
    let service = AgentService::new(state.db);
    let agent_id = service.create_agent(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAgentResponse {
            message: "Agent creat cu succes!".to_string(),
            agent_id,
        }),
    ))
}
