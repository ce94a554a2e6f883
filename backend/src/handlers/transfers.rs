//! HTTP handlers for inter-warehouse stock transfers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::TransferInput;
use crate::services::TransferService;
use crate::AppState;

#[derive(Serialize)]
pub struct TransferResponse {
    pub message: String,
}

/// Execute a warehouse-to-warehouse transfer
pub async fn execute_transfer(
    State(state): State<AppState>,
    Json(input): Json<TransferInput>,
) -> AppResult<Json<TransferResponse>> {
    let service = TransferService::new(state.db);
    service.execute_transfer(input).await?;

    Ok(Json(TransferResponse {
        message: "Mutare stoc efectuată cu succes.".to_string(),
    }))
}
