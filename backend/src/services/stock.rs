//! Stock balance and storage lookup service

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::error::{AppError, AppResult};
use crate::models::{ArticleAvailability, Storage};

/// Service for article lookups and per-storage balance queries
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Article reference data as stored on its balance rows
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub article_code: String,
    pub nomenclature: String,
    pub default_price: Decimal,
    pub vat_percent: Decimal,
}

/// Per-storage balance of one article
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StorageBalance {
    pub storage: String,
    pub quantity: Decimal,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Look up an article's default price and VAT by code
    pub async fn search_article(&self, code: &str) -> AppResult<ArticleSummary> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation {
                field: "code".to_string(),
                message: "Article code is required".to_string(),
                message_ro: "Cod lipsă".to_string(),
            });
        }

        sqlx::query_as::<_, ArticleSummary>(
            r#"
            SELECT article_code, nomenclature, default_price, vat_percent
            FROM stock_balance
            WHERE article_code = $1
            ORDER BY storage_id
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Articolul".to_string()))
    }

    /// List positive per-storage balances for an article, largest first.
    /// An absent code yields an empty list rather than an error.
    pub async fn balances_for_article(&self, code: Option<&str>) -> AppResult<Vec<StorageBalance>> {
        let code = match code.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => return Ok(Vec::new()),
        };

        let balances = sqlx::query_as::<_, StorageBalance>(
            r#"
            SELECT s.name AS storage, sb.quantity
            FROM stock_balance sb
            JOIN storages s ON sb.storage_id = s.id
            WHERE sb.article_code = $1 AND sb.quantity > 0
            ORDER BY sb.quantity DESC
            "#,
        )
        .bind(code)
        .fetch_all(&self.db)
        .await?;

        Ok(balances)
    }

    /// List all warehouses
    pub async fn list_storages(&self) -> AppResult<Vec<Storage>> {
        let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM storages ORDER BY id")
            .fetch_all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Storage { id, name })
            .collect())
    }
}

/// Storages holding a positive balance of an article, ordered by descending
/// quantity. Runs inside the caller's transaction so it observes that
/// transaction's own writes.
pub(crate) async fn article_availability(
    tx: &mut Transaction<'_, Postgres>,
    article_code: &str,
) -> Result<Vec<ArticleAvailability>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, Decimal)>(
        r#"
        SELECT s.name, sb.quantity
        FROM stock_balance sb
        JOIN storages s ON sb.storage_id = s.id
        WHERE sb.article_code = $1 AND sb.quantity > 0
        ORDER BY sb.quantity DESC
        "#,
    )
    .bind(article_code)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(storage_name, quantity)| ArticleAvailability {
            storage_name,
            quantity,
        })
        .collect())
}
