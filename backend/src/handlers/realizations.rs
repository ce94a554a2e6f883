//! HTTP handlers for the realization lifecycle and receipt printing

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{
    ConfirmRealizationInput, CreateRealizationInput, ReceiptDetail, ReplaceItemsInput,
};
use crate::services::realization::PrintOutcome;
use crate::services::RealizationService;
use crate::AppState;

/// Response carrying the generated document id
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRealizationResponse {
    pub realization_id: String,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptQuery {
    pub realization_id: Option<i64>,
}

/// Create a draft realization
pub async fn create_realization(
    State(state): State<AppState>,
    Json(input): Json<CreateRealizationInput>,
) -> AppResult<(StatusCode, Json<CreateRealizationResponse>)> {
    let service = RealizationService::new(state.db);
    let realization_id = service.create_draft(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRealizationResponse {
            realization_id: realization_id.to_string(),
        }),
    ))
}

/// Replace the item set of a draft realization
pub async fn replace_items(
    State(state): State<AppState>,
    Path(realization_id): Path<i64>,
    Json(input): Json<ReplaceItemsInput>,
) -> AppResult<Json<OkResponse>> {
    let service = RealizationService::new(state.db);
    service.replace_items(realization_id, input.items).await?;
    Ok(Json(OkResponse { ok: true }))
}

/// Confirm a realization: freeze header fields and totals (no stock deduction)
pub async fn confirm_realization(
    State(state): State<AppState>,
    Path(realization_id): Path<i64>,
    Json(input): Json<ConfirmRealizationInput>,
) -> AppResult<Json<OkResponse>> {
    let service = RealizationService::new(state.db);
    service.confirm(realization_id, input).await?;
    Ok(Json(OkResponse { ok: true }))
}

/// Print trigger: idempotently confirm, deduct stock, and log movements
pub async fn print_realization(
    State(state): State<AppState>,
    Path(realization_id): Path<i64>,
) -> AppResult<Response> {
    let service = RealizationService::new(state.db);

    let response = match service.confirm_and_deduct(realization_id).await? {
        PrintOutcome::Confirmed => Json(OkResponse { ok: true }).into_response(),
        PrintOutcome::AlreadyConfirmed => Json(MessageResponse {
            message: "Deja confirmată".to_string(),
        })
        .into_response(),
    };

    Ok(response)
}

/// Full receipt detail by path id
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(realization_id): Path<i64>,
) -> AppResult<Json<ReceiptDetail>> {
    let service = RealizationService::new(state.db);
    let receipt = service.get_receipt(realization_id).await?;
    Ok(Json(receipt))
}

/// Full receipt detail by query parameter
pub async fn get_receipt_by_query(
    State(state): State<AppState>,
    Query(query): Query<ReceiptQuery>,
) -> AppResult<Json<ReceiptDetail>> {
    let realization_id = query.realization_id.ok_or_else(|| AppError::Validation {
        field: "realizationId".to_string(),
        message: "The document id is required".to_string(),
        message_ro: "ID-ul documentului este obligatoriu.".to_string(),
    })?;

    let service = RealizationService::new(state.db);
    let receipt = service.get_receipt(realization_id).await?;
    Ok(Json(receipt))
}
