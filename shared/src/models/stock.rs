//! Stock balance, movement, and transfer models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kinds of quantity changes recorded in the movement ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Sale,
    Transfer,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Sale => "sale",
            MovementType::Transfer => "transfer",
        }
    }
}

/// Current on-hand quantity of one article at one storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockBalance {
    pub id: i64,
    pub storage_id: i64,
    pub article_code: String,
    pub nomenclature: String,
    pub quantity: Decimal,
    pub default_price: Decimal,
    pub vat_percent: Decimal,
}

/// Append-only ledger entry recording a quantity change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: i64,
    pub realization_id: Option<i64>,
    pub storage_id: i64,
    pub article_code: String,
    pub nomenclature: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub vat_percent: Decimal,
    pub from_storage_id: Option<i64>,
    pub to_storage_id: Option<i64>,
    pub movement_type: MovementType,
    pub created_at: DateTime<Utc>,
}

/// A warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    pub id: i64,
    pub name: String,
}

/// One line of a transfer request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferItemInput {
    pub article_code: String,
    pub quantity: Decimal,
}

/// Input for a warehouse-to-warehouse transfer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInput {
    pub from: Option<i64>,
    pub to: Option<i64>,
    #[serde(default)]
    pub items: Vec<TransferItemInput>,
    /// Optional document id grouping the movement rows for reporting
    pub realization_id: Option<i64>,
}

/// A storage holding a positive balance of an article, for shortfall messages
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleAvailability {
    pub storage_name: String,
    pub quantity: Decimal,
}

/// One raw transfer-ledger row as read for the transfer report
#[derive(Debug, Clone)]
pub struct TransferMovementRecord {
    pub movement_id: i64,
    pub realization_id: Option<i64>,
    pub document_date: DateTime<Utc>,
    pub from_storage_id: i64,
    pub to_storage_id: i64,
    pub from_storage_name: String,
    pub to_storage_name: String,
    pub article_code: String,
    pub nomenclature: String,
    pub quantity: Decimal,
}

/// A transfer document grouped from its movement rows
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocument {
    pub doc_id: String,
    pub document_date: DateTime<Utc>,
    pub from_storage_id: i64,
    pub to_storage_id: i64,
    pub from_storage_name: String,
    pub to_storage_name: String,
    pub items: Vec<TransferDocumentItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDocumentItem {
    pub article_code: String,
    pub nomenclature: String,
    pub quantity: Decimal,
}

impl TransferDocument {
    /// Group ledger rows into documents, one per realization id (rows without
    /// one stand alone under their movement id). Input order is preserved, so
    /// rows sorted newest-first produce documents sorted newest-first.
    pub fn group(rows: Vec<TransferMovementRecord>) -> Vec<TransferDocument> {
        let mut documents: Vec<TransferDocument> = Vec::new();
        let mut index: std::collections::HashMap<String, usize> =
            std::collections::HashMap::new();

        for row in rows {
            let doc_id = match row.realization_id {
                Some(id) => id.to_string(),
                None => format!("m{}", row.movement_id),
            };

            let position = match index.get(&doc_id) {
                Some(&pos) => pos,
                None => {
                    documents.push(TransferDocument {
                        doc_id: doc_id.clone(),
                        document_date: row.document_date,
                        from_storage_id: row.from_storage_id,
                        to_storage_id: row.to_storage_id,
                        from_storage_name: row.from_storage_name.clone(),
                        to_storage_name: row.to_storage_name.clone(),
                        items: Vec::new(),
                    });
                    index.insert(doc_id, documents.len() - 1);
                    documents.len() - 1
                }
            };

            documents[position].items.push(TransferDocumentItem {
                article_code: row.article_code,
                nomenclature: row.nomenclature,
                quantity: row.quantity,
            });
        }

        documents
    }
}
