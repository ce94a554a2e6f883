//! Warehouse-to-warehouse stock transfer service

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::{MovementType, TransferInput};
use crate::services::stock::article_availability;
use shared::validation::shortfall_message;

/// Service executing atomic stock transfers between warehouses
#[derive(Clone)]
pub struct TransferService {
    db: PgPool,
}

impl TransferService {
    /// Create a new TransferService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Move quantities of articles from one warehouse to another.
    ///
    /// Every item is processed optimistically; shortfalls are collected so the
    /// response names every insufficient article at once. Any shortfall rolls
    /// back the entire batch.
    pub async fn execute_transfer(&self, input: TransferInput) -> AppResult<()> {
        let (from, to) = match (input.from, input.to) {
            (Some(from), Some(to)) if !input.items.is_empty() => (from, to),
            _ => {
                return Err(AppError::Validation {
                    field: "from/to/items".to_string(),
                    message: "Source, destination and items are required".to_string(),
                    message_ro: "Date insuficiente.".to_string(),
                })
            }
        };

        if from == to {
            return Err(AppError::Validation {
                field: "to".to_string(),
                message: "Source and destination storages must differ".to_string(),
                message_ro: "Depozitul sursă nu poate fi identic cu destinația.".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;
        let mut shortfalls: Vec<String> = Vec::new();

        for item in &input.items {
            if item.quantity <= Decimal::ZERO {
                continue;
            }

            // Conditional decrement: succeeds only when the source row exists
            // and holds at least the requested quantity
            let source = sqlx::query_as::<_, (String, Decimal, Decimal)>(
                r#"
                UPDATE stock_balance
                SET quantity = quantity - $1
                WHERE storage_id = $2 AND article_code = $3 AND quantity >= $1
                RETURNING nomenclature, default_price, vat_percent
                "#,
            )
            .bind(item.quantity)
            .bind(from)
            .bind(&item.article_code)
            .fetch_optional(&mut *tx)
            .await?;

            let (nomenclature, default_price, vat_percent) = match source {
                Some(row) => row,
                None => {
                    let available = article_availability(&mut tx, &item.article_code).await?;
                    shortfalls.push(shortfall_message(&item.article_code, &available));
                    continue;
                }
            };

            sqlx::query(
                r#"
                INSERT INTO stock_balance
                    (storage_id, article_code, nomenclature, quantity, default_price, vat_percent)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (storage_id, article_code)
                DO UPDATE SET quantity = stock_balance.quantity + EXCLUDED.quantity
                "#,
            )
            .bind(to)
            .bind(&item.article_code)
            .bind(&nomenclature)
            .bind(item.quantity)
            .bind(default_price)
            .bind(vat_percent)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO stock_movements
                    (realization_id, storage_id, article_code, nomenclature, quantity,
                     unit_price, vat_percent, from_storage_id, to_storage_id, movement_type)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(input.realization_id)
            .bind(to)
            .bind(&item.article_code)
            .bind(&nomenclature)
            .bind(item.quantity)
            .bind(default_price)
            .bind(vat_percent)
            .bind(from)
            .bind(to)
            .bind(MovementType::Transfer.as_str())
            .execute(&mut *tx)
            .await?;
        }

        if !shortfalls.is_empty() {
            // Dropping the transaction discards the deductions already made
            return Err(AppError::InsufficientStock(shortfalls.join(" ")));
        }

        tx.commit().await?;

        Ok(())
    }
}
