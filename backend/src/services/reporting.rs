//! Reporting service: sales aggregates, transfer documents, settlements

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::{TransferDocument, TransferMovementRecord};

/// Service producing the settlement and transaction reports
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Filters for the realization (sales) report
#[derive(Debug, Clone)]
pub struct RealizationReportFilter {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Substring match against article codes
    pub article_code: Option<String>,
    /// Restrict to one storage; None means all
    pub storage_id: Option<i64>,
}

/// One aggregated sales report line
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizationReportRow {
    pub date: DateTime<Utc>,
    pub nomenclature: String,
    pub storage: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
}

/// Grand totals across the report
#[derive(Debug, Clone, Serialize, Default)]
pub struct ReportTotals {
    pub quantity: Decimal,
    pub amount: Decimal,
}

/// Full realization report payload
#[derive(Debug, Clone, Serialize)]
pub struct RealizationReport {
    pub items: Vec<RealizationReportRow>,
    pub totals: ReportTotals,
}

/// Daily settlement line for one agent
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementItem {
    pub agent_id: i64,
    pub agent_name: String,
    pub total_amount: Decimal,
}

/// Settlement report payload
#[derive(Debug, Clone, Serialize)]
pub struct SettlementReport {
    pub items: Vec<SettlementItem>,
}

/// Row for the transfer-ledger query
#[derive(Debug, FromRow)]
struct TransferRow {
    id: i64,
    realization_id: Option<i64>,
    created_at: DateTime<Utc>,
    from_storage_id: i64,
    to_storage_id: i64,
    from_storage_name: String,
    to_storage_name: String,
    article_code: String,
    nomenclature: String,
    quantity: Decimal,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Aggregated confirmed-sales report over a date range, grouped by
    /// (nomenclature, unit price)
    pub async fn realization_report(
        &self,
        filter: &RealizationReportFilter,
    ) -> AppResult<RealizationReport> {
        let rows = sqlx::query_as::<_, (DateTime<Utc>, String, Decimal, Decimal, Decimal, String)>(
            r#"
            SELECT MAX(sr.created_at) AS date,
                   si.nomenclature,
                   SUM(si.quantity) AS quantity,
                   si.unit_price,
                   SUM(si.quantity * si.unit_price) AS total,
                   MAX(st.name) AS storage_name
            FROM stock_realizations sr
            JOIN stock_items si ON sr.realization_id = si.realization_id
            JOIN storages st ON sr.storage_id = st.id
            WHERE sr.status = 'confirmed'
              AND sr.created_at::date BETWEEN $1 AND $2
              AND ($3::text IS NULL OR si.article_code ILIKE '%' || $3 || '%')
              AND ($4::bigint IS NULL OR sr.storage_id = $4)
            GROUP BY si.nomenclature, si.unit_price
            ORDER BY MAX(sr.created_at) DESC, si.nomenclature
            "#,
        )
        .bind(filter.from)
        .bind(filter.to)
        .bind(&filter.article_code)
        .bind(filter.storage_id)
        .fetch_all(&self.db)
        .await?;

        let items: Vec<RealizationReportRow> = rows
            .into_iter()
            .map(
                |(date, nomenclature, quantity, unit_price, total, storage)| {
                    RealizationReportRow {
                        date,
                        nomenclature,
                        storage,
                        quantity,
                        unit_price,
                        total,
                    }
                },
            )
            .collect();

        let totals = items.iter().fold(ReportTotals::default(), |mut acc, row| {
            acc.quantity += row.quantity;
            acc.amount += row.total;
            acc
        });

        Ok(RealizationReport { items, totals })
    }

    /// Transfer documents touching a storage as source or destination,
    /// newest first, grouped from the movement ledger
    pub async fn transfer_report(&self, storage_id: i64) -> AppResult<Vec<TransferDocument>> {
        let rows = sqlx::query_as::<_, TransferRow>(
            r#"
            SELECT sm.id, sm.realization_id, sm.created_at,
                   sm.from_storage_id, sm.to_storage_id,
                   s_from.name AS from_storage_name,
                   s_to.name AS to_storage_name,
                   sm.article_code, sm.nomenclature, sm.quantity
            FROM stock_movements sm
            JOIN storages s_from ON s_from.id = sm.from_storage_id
            JOIN storages s_to ON s_to.id = sm.to_storage_id
            WHERE sm.movement_type = 'transfer'
              AND (sm.from_storage_id = $1 OR sm.to_storage_id = $1)
            ORDER BY sm.created_at DESC, sm.id DESC
            "#,
        )
        .bind(storage_id)
        .fetch_all(&self.db)
        .await?;

        let records = rows
            .into_iter()
            .map(|row| TransferMovementRecord {
                movement_id: row.id,
                realization_id: row.realization_id,
                document_date: row.created_at,
                from_storage_id: row.from_storage_id,
                to_storage_id: row.to_storage_id,
                from_storage_name: row.from_storage_name,
                to_storage_name: row.to_storage_name,
                article_code: row.article_code,
                nomenclature: row.nomenclature,
                quantity: row.quantity,
            })
            .collect();

        Ok(TransferDocument::group(records))
    }

    /// Daily confirmed-sales total for one agent; the display name comes
    /// from the agents reference table
    pub async fn settlement_report(
        &self,
        date: NaiveDate,
        agent_id: i64,
    ) -> AppResult<SettlementReport> {
        let rows = sqlx::query_as::<_, (i64, String, Decimal)>(
            r#"
            SELECT sr.agent_id, a.name, SUM(sr.total_amount) AS total_amount
            FROM stock_realizations sr
            JOIN agents a ON a.id = sr.agent_id
            WHERE sr.status = 'confirmed'
              AND sr.agent_id = $1
              AND sr.created_at::date = $2
            GROUP BY sr.agent_id, a.name
            "#,
        )
        .bind(agent_id)
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        let items = rows
            .into_iter()
            .map(|(agent_id, agent_name, total_amount)| SettlementItem {
                agent_id,
                agent_name,
                total_amount,
            })
            .collect();

        Ok(SettlementReport { items })
    }

    /// Serialize report rows as CSV for download
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
