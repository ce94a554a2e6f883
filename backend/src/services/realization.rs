//! Stock realization (sales document) lifecycle service
//!
//! A realization is created as a draft, accumulates line items, and is
//! confirmed exactly once. Stock is deducted only by the print trigger,
//! which is idempotent.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::error::{AppError, AppResult};
use crate::models::{
    ConfirmRealizationInput, CreateRealizationInput, MovementType, RealizationItemInput,
    RealizationStatus, ReceiptDetail, ReceiptItem,
};
use crate::services::stock::article_availability;
use shared::types::DocumentTotals;
use shared::validation::{line_total, shortfall_message, vat_value, verify_declared_totals};

/// Service managing the draft -> confirmed lifecycle of realizations
#[derive(Clone)]
pub struct RealizationService {
    db: PgPool,
}

/// Result of the idempotent confirm-and-deduct trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOutcome {
    /// Stock was deducted and movements logged in this call
    Confirmed,
    /// The document was already confirmed; nothing was written
    AlreadyConfirmed,
}

/// Line item row of one realization
#[derive(Debug, FromRow)]
struct ItemRow {
    article_code: String,
    nomenclature: String,
    quantity: Decimal,
    unit_price: Decimal,
    vat_percent: Decimal,
}

/// Document header joined with its agent, for receipts
#[derive(Debug, FromRow)]
struct ReceiptHeaderRow {
    realization_id: i64,
    document_number: Option<String>,
    created_at: DateTime<Utc>,
    total_amount: Decimal,
    total_vat: Decimal,
    agent_name: String,
}

impl RealizationService {
    /// Create a new RealizationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a draft realization and return its generated id
    pub async fn create_draft(&self, input: CreateRealizationInput) -> AppResult<i64> {
        let agent_id = input.agent_id.ok_or_else(|| AppError::Validation {
            field: "agentId".to_string(),
            message: "Missing required field: agentId".to_string(),
            message_ro: "Câmp obligatoriu lipsă: agentId".to_string(),
        })?;

        let agent_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM agents WHERE id = $1)")
                .bind(agent_id)
                .fetch_one(&self.db)
                .await?;

        if !agent_exists {
            return Err(AppError::NotFound("Agentul".to_string()));
        }

        let realization_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO stock_realizations (agent_id, storage_id, article_id, status)
            VALUES ($1, $2, $3, 'draft')
            RETURNING realization_id
            "#,
        )
        .bind(agent_id)
        .bind(input.storage_id)
        .bind(input.article_id)
        .fetch_one(&self.db)
        .await?;

        Ok(realization_id)
    }

    /// Replace the full item set of a draft realization.
    /// Line totals and VAT values are computed server-side per line.
    pub async fn replace_items(
        &self,
        realization_id: i64,
        items: Vec<RealizationItemInput>,
    ) -> AppResult<()> {
        if items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Items list must not be empty".to_string(),
                message_ro: "Items lipsă".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let status = self.fetch_status(&mut tx, realization_id).await?;
        ensure_editable(status)?;

        write_items(&mut tx, realization_id, &items).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Confirm a realization: set header fields, verify and freeze totals,
    /// and store the authoritative item set. Does not touch stock balances.
    pub async fn confirm(
        &self,
        realization_id: i64,
        input: ConfirmRealizationInput,
    ) -> AppResult<()> {
        let agent_id = input.agent_id.ok_or_else(|| AppError::Validation {
            field: "agentId".to_string(),
            message: "Missing required field: agentId".to_string(),
            message_ro: "Date invalide".to_string(),
        })?;

        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Items list must not be empty".to_string(),
                message_ro: "Items lipsă".to_string(),
            });
        }

        // Declared totals are never trusted; the document freezes the
        // recomputed values
        let declared = DocumentTotals::new(input.total_amount, input.total_vat);
        let totals = verify_declared_totals(&input.items, declared).map_err(|mismatch| {
            AppError::Validation {
                field: "totalAmount/totalVAT".to_string(),
                message: format!(
                    "Declared totals do not match the items: expected {} / {}",
                    mismatch.expected.total_amount, mismatch.expected.total_vat
                ),
                message_ro: format!(
                    "Totalurile declarate nu corespund articolelor: așteptat {} / {}",
                    mismatch.expected.total_amount, mismatch.expected.total_vat
                ),
            }
        })?;

        let mut tx = self.db.begin().await?;

        let status = self.fetch_status(&mut tx, realization_id).await?;
        ensure_editable(status)?;

        sqlx::query(
            r#"
            UPDATE stock_realizations
            SET agent_id = $1,
                storage_id = $2,
                invoice_number = $3,
                document_number = $4,
                total_amount = $5,
                total_vat = $6,
                status = 'confirmed',
                confirmed_at = now()
            WHERE realization_id = $7
            "#,
        )
        .bind(agent_id)
        .bind(input.storage_id)
        .bind(&input.invoice_number)
        .bind(&input.document_number)
        .bind(totals.total_amount)
        .bind(totals.total_vat)
        .bind(realization_id)
        .execute(&mut *tx)
        .await?;

        write_items(&mut tx, realization_id, &input.items).await?;

        tx.commit().await?;

        Ok(())
    }

    /// Idempotent print trigger: confirm the document, deduct every item from
    /// the source storage balance, and log one sale movement per item. A
    /// second call short-circuits without writing anything.
    pub async fn confirm_and_deduct(&self, realization_id: i64) -> AppResult<PrintOutcome> {
        let mut tx = self.db.begin().await?;

        // Guarded status flip doubles as the idempotence check: zero rows
        // affected means the document is absent or already confirmed
        let flipped = sqlx::query(
            r#"
            UPDATE stock_realizations
            SET status = 'confirmed', confirmed_at = now()
            WHERE realization_id = $1 AND status = 'draft'
            "#,
        )
        .bind(realization_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped == 0 {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM stock_realizations WHERE realization_id = $1)",
            )
            .bind(realization_id)
            .fetch_one(&mut *tx)
            .await?;

            if !exists {
                return Err(AppError::NotFound("Realizarea".to_string()));
            }
            tx.commit().await?;
            return Ok(PrintOutcome::AlreadyConfirmed);
        }

        let storage_id = sqlx::query_scalar::<_, i64>(
            "SELECT storage_id FROM stock_realizations WHERE realization_id = $1",
        )
        .bind(realization_id)
        .fetch_one(&mut *tx)
        .await?;

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT article_code, nomenclature, quantity, unit_price, vat_percent
            FROM stock_items
            WHERE realization_id = $1
            ORDER BY id
            "#,
        )
        .bind(realization_id)
        .fetch_all(&mut *tx)
        .await?;

        if items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "The document has no items".to_string(),
                message_ro: "Documentul nu conține articole".to_string(),
            });
        }

        let mut shortfalls: Vec<String> = Vec::new();

        for item in &items {
            let deducted = sqlx::query(
                r#"
                UPDATE stock_balance
                SET quantity = quantity - $1
                WHERE storage_id = $2 AND article_code = $3 AND quantity >= $1
                "#,
            )
            .bind(item.quantity)
            .bind(storage_id)
            .bind(&item.article_code)
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if deducted == 0 {
                let available = article_availability(&mut tx, &item.article_code).await?;
                shortfalls.push(shortfall_message(&item.article_code, &available));
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO stock_movements
                    (realization_id, storage_id, article_code, nomenclature, quantity,
                     unit_price, vat_percent, movement_type)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(realization_id)
            .bind(storage_id)
            .bind(&item.article_code)
            .bind(&item.nomenclature)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.vat_percent)
            .bind(MovementType::Sale.as_str())
            .execute(&mut *tx)
            .await?;
        }

        if !shortfalls.is_empty() {
            // Rolls back the status flip and every deduction in this call
            return Err(AppError::InsufficientStock(shortfalls.join(" ")));
        }

        tx.commit().await?;

        Ok(PrintOutcome::Confirmed)
    }

    /// Assemble the full document detail for receipt printing
    pub async fn get_receipt(&self, realization_id: i64) -> AppResult<ReceiptDetail> {
        let header = sqlx::query_as::<_, ReceiptHeaderRow>(
            r#"
            SELECT sr.realization_id, sr.document_number, sr.created_at,
                   sr.total_amount, sr.total_vat, a.name AS agent_name
            FROM stock_realizations sr
            JOIN agents a ON a.id = sr.agent_id
            WHERE sr.realization_id = $1
            "#,
        )
        .bind(realization_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Documentul".to_string()))?;

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT article_code, nomenclature, quantity, unit_price, vat_percent
            FROM stock_items
            WHERE realization_id = $1
            ORDER BY id
            "#,
        )
        .bind(realization_id)
        .fetch_all(&self.db)
        .await?;

        // Transfer documents carry their endpoints on the movement rows
        let transfer_route = sqlx::query_as::<_, (Option<i64>, Option<i64>)>(
            r#"
            SELECT from_storage_id, to_storage_id
            FROM stock_movements
            WHERE realization_id = $1 AND movement_type = 'transfer'
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(realization_id)
        .fetch_optional(&self.db)
        .await?;

        let (from_storage_name, to_storage_name) = match transfer_route {
            Some((Some(from_id), Some(to_id))) => (
                self.storage_name(from_id).await?,
                self.storage_name(to_id).await?,
            ),
            _ => ("N/A".to_string(), "N/A".to_string()),
        };

        let items = items
            .into_iter()
            .map(|row| {
                let line = line_total(row.quantity, row.unit_price);
                ReceiptItem {
                    article_code: row.article_code,
                    nomenclature: row.nomenclature,
                    quantity: row.quantity,
                    unit_price: row.unit_price,
                    vat_percent: row.vat_percent,
                    vat_value: vat_value(line, row.vat_percent),
                    line_total: line,
                }
            })
            .collect();

        Ok(ReceiptDetail {
            realization_id: header.realization_id,
            document_number: header
                .document_number
                .unwrap_or_else(|| header.realization_id.to_string()),
            document_date: header.created_at,
            from_storage_name,
            to_storage_name,
            agent_name: header.agent_name,
            total_amount: header.total_amount,
            total_vat: header.total_vat,
            items,
        })
    }

    async fn storage_name(&self, storage_id: i64) -> AppResult<String> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM storages WHERE id = $1")
            .bind(storage_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(name.unwrap_or_else(|| "N/A".to_string()))
    }

    async fn fetch_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        realization_id: i64,
    ) -> AppResult<RealizationStatus> {
        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM stock_realizations WHERE realization_id = $1",
        )
        .bind(realization_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Realizarea".to_string()))?;

        RealizationStatus::parse(&status)
            .ok_or_else(|| AppError::Internal(format!("Unknown realization status: {}", status)))
    }
}

/// Reject edits to documents past the draft state
fn ensure_editable(status: RealizationStatus) -> AppResult<()> {
    if status.can_transition_to(RealizationStatus::Confirmed) {
        Ok(())
    } else {
        Err(AppError::Conflict {
            resource: "status".to_string(),
            message: "The document is already confirmed".to_string(),
            message_ro: "Documentul este deja confirmat".to_string(),
        })
    }
}

/// Replace the item rows of a realization inside the caller's transaction
async fn write_items(
    tx: &mut Transaction<'_, Postgres>,
    realization_id: i64,
    items: &[RealizationItemInput],
) -> AppResult<()> {
    sqlx::query("DELETE FROM stock_items WHERE realization_id = $1")
        .bind(realization_id)
        .execute(&mut **tx)
        .await?;

    for item in items {
        let line = line_total(item.quantity, item.unit_price);
        let vat = vat_value(line, item.vat_percent);

        sqlx::query(
            r#"
            INSERT INTO stock_items
                (realization_id, article_code, nomenclature, quantity,
                 unit_price, vat_percent, line_total, vat_value)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(realization_id)
        .bind(&item.article_code)
        .bind(item.nomenclature.as_deref().unwrap_or(""))
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.vat_percent)
        .bind(line)
        .bind(vat)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
