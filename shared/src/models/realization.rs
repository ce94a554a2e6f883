//! Stock realization (sales document) models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a realization document.
/// The only transition is draft -> confirmed; confirmed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RealizationStatus {
    Draft,
    Confirmed,
}

impl RealizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RealizationStatus::Draft => "draft",
            RealizationStatus::Confirmed => "confirmed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(RealizationStatus::Draft),
            "confirmed" => Some(RealizationStatus::Confirmed),
            _ => None,
        }
    }

    /// Whether this document may still be edited or confirmed
    pub fn can_transition_to(&self, next: RealizationStatus) -> bool {
        matches!(
            (self, next),
            (RealizationStatus::Draft, RealizationStatus::Confirmed)
        )
    }
}

/// A sales/transfer document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRealization {
    pub realization_id: i64,
    pub agent_id: i64,
    pub storage_id: i64,
    pub article_id: i64,
    pub status: RealizationStatus,
    pub invoice_number: Option<String>,
    pub document_number: Option<String>,
    pub total_amount: Decimal,
    pub total_vat: Decimal,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// A line item owned by one realization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: i64,
    pub realization_id: i64,
    pub article_code: String,
    pub nomenclature: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub vat_percent: Decimal,
    pub line_total: Decimal,
    pub vat_value: Decimal,
}

/// Input for creating a draft realization
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRealizationInput {
    pub agent_id: Option<i64>,
    #[serde(default = "default_storage_id")]
    pub storage_id: i64,
    #[serde(default)]
    pub article_id: i64,
}

/// One line item as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizationItemInput {
    pub article_code: String,
    #[serde(default)]
    pub nomenclature: Option<String>,
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Decimal,
    #[serde(default = "default_vat_percent")]
    pub vat_percent: Decimal,
}

/// Input for replacing the item set of a draft realization
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceItemsInput {
    pub items: Vec<RealizationItemInput>,
}

/// Input for confirming a realization with header fields and declared totals
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRealizationInput {
    #[serde(default)]
    pub items: Vec<RealizationItemInput>,
    pub agent_id: Option<i64>,
    #[serde(default = "default_storage_id")]
    pub storage_id: i64,
    pub invoice_number: Option<String>,
    pub document_number: Option<String>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub total_vat: Decimal,
}

/// Full document detail assembled for receipt printing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDetail {
    pub realization_id: i64,
    pub document_number: String,
    pub document_date: DateTime<Utc>,
    pub from_storage_name: String,
    pub to_storage_name: String,
    pub agent_name: String,
    pub total_amount: Decimal,
    pub total_vat: Decimal,
    pub items: Vec<ReceiptItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub article_code: String,
    pub nomenclature: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub vat_percent: Decimal,
    pub line_total: Decimal,
    pub vat_value: Decimal,
}

fn default_storage_id() -> i64 {
    1
}

fn default_vat_percent() -> Decimal {
    Decimal::from(20)
}
