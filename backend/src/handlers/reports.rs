//! HTTP handlers for settlement and transaction reports

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::TransferDocument;
use crate::services::reporting::{RealizationReport, RealizationReportFilter, SettlementReport};
use crate::services::ReportingService;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizationReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub article_id: Option<String>,
    pub storage: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReportQuery {
    pub storage_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementQuery {
    pub date: Option<String>,
    pub agent_id: Option<i64>,
}

/// Aggregated sales report by date range, article, and storage
pub async fn stock_realizations_report(
    State(state): State<AppState>,
    Query(query): Query<RealizationReportQuery>,
) -> AppResult<impl IntoResponse> {
    let (from, to) = match (&query.from, &query.to) {
        (Some(from), Some(to)) => (parse_date(from)?, parse_date(to)?),
        _ => {
            return Err(AppError::Validation {
                field: "from/to".to_string(),
                message: "The report period is required".to_string(),
                message_ro: "Perioada este obligatorie".to_string(),
            })
        }
    };

    let storage_id = match query.storage.as_deref() {
        None | Some("all") | Some("") => None,
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| AppError::Validation {
            field: "storage".to_string(),
            message: "Invalid storage id".to_string(),
            message_ro: "Depozit invalid".to_string(),
        })?),
    };

    let filter = RealizationReportFilter {
        from,
        to,
        article_code: query.article_id.filter(|a| !a.is_empty()),
        storage_id,
    };

    let service = ReportingService::new(state.db);
    let report: RealizationReport = service.realization_report(&filter).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&report.items)?;
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"stock_realizations.csv\"",
                ),
            ],
            csv,
        )
            .into_response());
    }

    Ok(Json(report).into_response())
}

/// Transfer documents touching a storage
pub async fn stock_transfers_report(
    State(state): State<AppState>,
    Query(query): Query<TransferReportQuery>,
) -> AppResult<Json<Vec<TransferDocument>>> {
    let storage_id = query.storage_id.ok_or_else(|| AppError::Validation {
        field: "storageId".to_string(),
        message: "The storage id is required".to_string(),
        message_ro: "ID-ul depozitului este obligatoriu.".to_string(),
    })?;

    let service = ReportingService::new(state.db);
    let documents = service.transfer_report(storage_id).await?;
    Ok(Json(documents))
}

/// Daily confirmed-sales total for one agent
pub async fn settlements_report(
    State(state): State<AppState>,
    Query(query): Query<SettlementQuery>,
) -> AppResult<Json<SettlementReport>> {
    let (date, agent_id) = match (&query.date, query.agent_id) {
        (Some(date), Some(agent_id)) => (parse_date(date)?, agent_id),
        _ => {
            return Err(AppError::Validation {
                field: "date/agentId".to_string(),
                message: "The date and the agent are required".to_string(),
                message_ro: "Data și Contragentul sunt obligatorii.".to_string(),
            })
        }
    };

    let service = ReportingService::new(state.db);
    let report = service.settlement_report(date, agent_id).await?;
    Ok(Json(report))
}

fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    raw.parse::<NaiveDate>().map_err(|_| AppError::Validation {
        field: "date".to_string(),
        message: format!("Invalid date: {}", raw),
        message_ro: format!("Dată invalidă: {}", raw),
    })
}
