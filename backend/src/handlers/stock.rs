//! HTTP handlers for article lookup, stock balances, and storages

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::Storage;
use crate::services::stock::{ArticleSummary, StorageBalance};
use crate::services::StockService;
use crate::AppState;

#[derive(Deserialize)]
pub struct ArticleSearchQuery {
    pub code: Option<String>,
}

#[derive(Deserialize)]
pub struct StockBalanceQuery {
    pub code: Option<String>,
}

/// Look up an article's default price and VAT by code
pub async fn search_article(
    State(state): State<AppState>,
    Query(query): Query<ArticleSearchQuery>,
) -> AppResult<Json<ArticleSummary>> {
    let service = StockService::new(state.db);
    let article = service
        .search_article(query.code.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(article))
}

/// List per-storage balances for an article
pub async fn get_stock_balance(
    State(state): State<AppState>,
    Query(query): Query<StockBalanceQuery>,
) -> AppResult<Json<Vec<StorageBalance>>> {
    let service = StockService::new(state.db);
    let balances = service.balances_for_article(query.code.as_deref()).await?;
    Ok(Json(balances))
}

/// List all warehouses
pub async fn list_storages(State(state): State<AppState>) -> AppResult<Json<Vec<Storage>>> {
    let service = StockService::new(state.db);
    let storages = service.list_storages().await?;
    Ok(Json(storages))
}
