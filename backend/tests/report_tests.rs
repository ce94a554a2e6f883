//! Report and ledger-shape tests
//!
//! Tests for transfer-document grouping, report date filtering, and the
//! wire shape of the persisted stock entities.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{TransferDocument, TransferMovementRecord};
use shared::types::DateRange;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
}

fn record(
    movement_id: i64,
    realization_id: Option<i64>,
    date: DateTime<Utc>,
    article: &str,
    quantity: &str,
) -> TransferMovementRecord {
    TransferMovementRecord {
        movement_id,
        realization_id,
        document_date: date,
        from_storage_id: 1,
        to_storage_id: 2,
        from_storage_name: "Depozit Central".to_string(),
        to_storage_name: "Magazin".to_string(),
        article_code: article.to_string(),
        nomenclature: format!("Articol {}", article),
        quantity: dec(quantity),
    }
}

// ============================================================================
// Transfer Document Grouping Tests
// ============================================================================

#[cfg(test)]
mod grouping_tests {
    use super::*;

    #[test]
    fn test_rows_group_by_realization_id() {
        let rows = vec![
            record(10, Some(5), at(12), "A1", "3"),
            record(11, Some(5), at(12), "A2", "1"),
            record(12, Some(6), at(10), "A1", "7"),
        ];

        let documents = TransferDocument::group(rows);

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].doc_id, "5");
        assert_eq!(documents[0].items.len(), 2);
        assert_eq!(documents[1].doc_id, "6");
        assert_eq!(documents[1].items.len(), 1);
    }

    #[test]
    fn test_newest_first_order_is_preserved() {
        // Rows arrive sorted newest-first, as the ledger query produces them
        let rows = vec![
            record(12, Some(6), at(15), "A1", "7"),
            record(10, Some(5), at(12), "A1", "3"),
        ];

        let documents = TransferDocument::group(rows);

        assert_eq!(documents[0].doc_id, "6");
        assert_eq!(documents[1].doc_id, "5");
        assert!(documents[0].document_date > documents[1].document_date);
    }

    #[test]
    fn test_rows_without_document_id_stand_alone() {
        let rows = vec![
            record(10, None, at(12), "A1", "3"),
            record(11, None, at(12), "A2", "1"),
        ];

        let documents = TransferDocument::group(rows);

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].doc_id, "m10");
        assert_eq!(documents[1].doc_id, "m11");
    }

    #[test]
    fn test_item_order_follows_row_order() {
        let rows = vec![
            record(10, Some(5), at(12), "A2", "1"),
            record(11, Some(5), at(12), "A1", "3"),
        ];

        let documents = TransferDocument::group(rows);

        let codes: Vec<&str> = documents[0]
            .items
            .iter()
            .map(|i| i.article_code.as_str())
            .collect();
        assert_eq!(codes, vec!["A2", "A1"]);
    }

    #[test]
    fn test_document_carries_storage_names() {
        let documents = TransferDocument::group(vec![record(10, Some(5), at(12), "A1", "3")]);

        assert_eq!(documents[0].from_storage_name, "Depozit Central");
        assert_eq!(documents[0].to_storage_name, "Magazin");
        assert_eq!(documents[0].from_storage_id, 1);
        assert_eq!(documents[0].to_storage_id, 2);
    }

    #[test]
    fn test_empty_ledger_groups_to_nothing() {
        assert!(TransferDocument::group(Vec::new()).is_empty());
    }
}

// ============================================================================
// Report Filter Tests
// ============================================================================

#[cfg(test)]
mod filter_tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::new(day(1), day(30));
        assert!(range.contains(day(1)));
        assert!(range.contains(day(15)));
        assert!(range.contains(day(30)));
    }

    #[test]
    fn test_date_range_excludes_outside_days() {
        let range = DateRange::new(day(10), day(20));
        assert!(!range.contains(day(9)));
        assert!(!range.contains(day(21)));
    }
}

// ============================================================================
// Wire Shape Tests
// ============================================================================

#[cfg(test)]
mod wire_tests {
    use super::*;
    use shared::models::{
        MovementType, RealizationStatus, StockBalance, StockItem, StockMovement, StockRealization,
    };

    #[test]
    fn test_movement_type_storage_form() {
        assert_eq!(MovementType::Sale.as_str(), "sale");
        assert_eq!(MovementType::Transfer.as_str(), "transfer");
    }

    #[test]
    fn test_stock_movement_serializes_camel_case() {
        let movement = StockMovement {
            id: 1,
            realization_id: Some(5),
            storage_id: 2,
            article_code: "A1".to_string(),
            nomenclature: "Articol A1".to_string(),
            quantity: dec("3"),
            unit_price: dec("10.00"),
            vat_percent: dec("20"),
            from_storage_id: Some(1),
            to_storage_id: Some(2),
            movement_type: MovementType::Transfer,
            created_at: at(12),
        };

        let json = serde_json::to_value(&movement).unwrap();
        assert_eq!(json["movementType"], "transfer");
        assert_eq!(json["fromStorageId"], 1);
        assert_eq!(json["toStorageId"], 2);
    }

    #[test]
    fn test_stock_balance_serializes_camel_case() {
        let balance = StockBalance {
            id: 1,
            storage_id: 1,
            article_code: "A1".to_string(),
            nomenclature: "Articol A1".to_string(),
            quantity: dec("15"),
            default_price: dec("10.00"),
            vat_percent: dec("20"),
        };

        let json = serde_json::to_value(&balance).unwrap();
        assert_eq!(json["articleCode"], "A1");
        assert_eq!(json["defaultPrice"], "10.00");
    }

    #[test]
    fn test_realization_with_items_serializes_camel_case() {
        let realization = StockRealization {
            realization_id: 5,
            agent_id: 7,
            storage_id: 1,
            article_id: 0,
            status: RealizationStatus::Confirmed,
            invoice_number: Some("F-001".to_string()),
            document_number: None,
            total_amount: dec("20.00"),
            total_vat: dec("4.00"),
            created_at: at(12),
            confirmed_at: Some(at(13)),
        };
        let item = StockItem {
            id: 1,
            realization_id: 5,
            article_code: "A1".to_string(),
            nomenclature: "Articol A1".to_string(),
            quantity: dec("2"),
            unit_price: dec("10.00"),
            vat_percent: dec("20"),
            line_total: dec("20.00"),
            vat_value: dec("4.00"),
        };

        let realization_json = serde_json::to_value(&realization).unwrap();
        assert_eq!(realization_json["status"], "confirmed");
        assert_eq!(realization_json["invoiceNumber"], "F-001");

        let item_json = serde_json::to_value(&item).unwrap();
        assert_eq!(item_json["lineTotal"], "20.00");
        assert_eq!(item_json["vatValue"], "4.00");
    }
}
