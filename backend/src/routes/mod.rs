//! Route definitions for the UNA Stock Management Platform

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Agent registration
        .nest("/agents", agent_routes())
        // Article lookup
        .nest("/articles", article_routes())
        // Realization lifecycle
        .nest("/realizations", realization_routes())
        // Warehouse transfers
        .nest("/transfers", transfer_routes())
        // Stock balance and storages
        .route("/stock-balance", get(handlers::get_stock_balance))
        .route("/storages", get(handlers::list_storages))
        // Reports
        .nest("/reports", report_routes())
        // Receipt printing
        .route("/receipt", get(handlers::get_receipt_by_query))
        .route("/receipt/:id", get(handlers::get_receipt))
}

/// Agent registration routes
fn agent_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::create_agent))
}

/// Article lookup routes
fn article_routes() -> Router<AppState> {
    Router::new().route("/search", get(handlers::search_article))
}

/// Realization lifecycle routes
fn realization_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_realization))
        .route("/:id/items", put(handlers::replace_items))
        .route("/:id/confirm", post(handlers::confirm_realization))
        .route("/:id/print", put(handlers::print_realization))
}

/// Warehouse transfer routes
fn transfer_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::execute_transfer))
}

/// Report routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stock-realizations",
            get(handlers::stock_realizations_report),
        )
        .route("/stock-transfers", get(handlers::stock_transfers_report))
        .route(
            "/settlements/contragents",
            get(handlers::settlements_report),
        )
}
