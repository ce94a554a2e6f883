//! Stock transfer tests
//!
//! Tests for the warehouse-to-warehouse transfer workflow:
//! - balance conservation across a successful transfer
//! - all-or-nothing rollback when any item is short
//! - shortfall message content

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{ArticleAvailability, TransferItemInput};
use shared::validation::shortfall_message;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// In-Memory Transfer Model
// ============================================================================

/// In-memory mirror of the transfer executor: per-item guarded decrement and
/// destination upsert, shortfalls collected, full rollback when any item is
/// short. Balances are keyed by (storage id, article code).
mod ledger {
    use super::*;
    use std::collections::BTreeMap;

    pub type Balances = BTreeMap<(i64, String), Decimal>;

    /// One recorded transfer movement: (article, quantity, from, to)
    pub type Movement = (String, Decimal, i64, i64);

    pub fn storage_name(id: i64) -> String {
        format!("Depozit {}", id)
    }

    /// Storages holding a positive balance of the article, largest first
    pub fn availability(balances: &Balances, article_code: &str) -> Vec<ArticleAvailability> {
        let mut rows: Vec<ArticleAvailability> = balances
            .iter()
            .filter(|((_, code), qty)| code == article_code && **qty > Decimal::ZERO)
            .map(|((storage_id, _), qty)| ArticleAvailability {
                storage_name: storage_name(*storage_id),
                quantity: *qty,
            })
            .collect();
        rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        rows
    }

    pub fn execute_transfer(
        balances: &mut Balances,
        movements: &mut Vec<Movement>,
        from: i64,
        to: i64,
        items: &[TransferItemInput],
    ) -> Result<(), Vec<String>> {
        let snapshot = balances.clone();
        let movement_mark = movements.len();
        let mut shortfalls = Vec::new();

        for item in items {
            if item.quantity <= Decimal::ZERO {
                continue;
            }

            let key = (from, item.article_code.clone());
            let held = balances.get(&key).copied().unwrap_or(Decimal::ZERO);
            if held < item.quantity || !balances.contains_key(&key) {
                shortfalls.push(shortfall_message(
                    &item.article_code,
                    &availability(balances, &item.article_code),
                ));
                continue;
            }

            *balances.get_mut(&key).unwrap() -= item.quantity;
            *balances
                .entry((to, item.article_code.clone()))
                .or_insert(Decimal::ZERO) += item.quantity;
            movements.push((item.article_code.clone(), item.quantity, from, to));
        }

        if !shortfalls.is_empty() {
            *balances = snapshot;
            movements.truncate(movement_mark);
            return Err(shortfalls);
        }

        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::ledger::*;
    use super::*;

    fn item(code: &str, quantity: &str) -> TransferItemInput {
        TransferItemInput {
            article_code: code.to_string(),
            quantity: dec(quantity),
        }
    }

    fn seed(entries: &[(i64, &str, &str)]) -> Balances {
        entries
            .iter()
            .map(|(storage, code, qty)| ((*storage, code.to_string()), dec(qty)))
            .collect()
    }

    /// Transfer 10 of A1 from W1 (15) to W2 (0): W1 -> 5, W2 -> 10, one movement
    #[test]
    fn test_successful_transfer_moves_quantity() {
        let mut balances = seed(&[(1, "A1", "15")]);
        let mut movements = Vec::new();

        let result = execute_transfer(
            &mut balances,
            &mut movements,
            1,
            2,
            &[item("A1", "10")],
        );

        assert!(result.is_ok());
        assert_eq!(balances[&(1, "A1".to_string())], dec("5"));
        assert_eq!(balances[&(2, "A1".to_string())], dec("10"));
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0], ("A1".to_string(), dec("10"), 1, 2));
    }

    /// Transfer 20 of A1 from W1 (15): fails, balances unchanged, message
    /// lists the storages holding A1
    #[test]
    fn test_insufficient_source_fails_without_changes() {
        let mut balances = seed(&[(1, "A1", "15")]);
        let mut movements = Vec::new();

        let result = execute_transfer(
            &mut balances,
            &mut movements,
            1,
            2,
            &[item("A1", "20")],
        );

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Articolul A1"));
        assert!(errors[0].contains("Depozit 1 (15 buc)"));
        assert_eq!(balances[&(1, "A1".to_string())], dec("15"));
        assert!(!balances.contains_key(&(2, "A1".to_string())));
        assert!(movements.is_empty());
    }

    /// A missing source row reports "niciun depozit" when nothing holds
    /// the article anywhere
    #[test]
    fn test_unknown_article_reports_no_storage() {
        let mut balances = seed(&[(1, "A1", "15")]);
        let mut movements = Vec::new();

        let result = execute_transfer(
            &mut balances,
            &mut movements,
            1,
            2,
            &[item("B9", "1")],
        );

        let errors = result.unwrap_err();
        assert!(errors[0].contains("niciun depozit"));
    }

    /// One short item rolls back every other successful item in the batch
    #[test]
    fn test_partial_shortfall_rolls_back_whole_batch() {
        let mut balances = seed(&[(1, "A1", "15"), (1, "A2", "3")]);
        let mut movements = Vec::new();

        let result = execute_transfer(
            &mut balances,
            &mut movements,
            1,
            2,
            &[item("A1", "10"), item("A2", "5")],
        );

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Articolul A2"));
        // A1 was deducted optimistically, then discarded with the batch
        assert_eq!(balances[&(1, "A1".to_string())], dec("15"));
        assert_eq!(balances[&(1, "A2".to_string())], dec("3"));
        assert!(movements.is_empty());
    }

    /// Every short item produces its own message
    #[test]
    fn test_all_shortfalls_reported_together() {
        let mut balances = seed(&[(1, "A1", "1"), (1, "A2", "1")]);
        let mut movements = Vec::new();

        let result = execute_transfer(
            &mut balances,
            &mut movements,
            1,
            2,
            &[item("A1", "5"), item("A2", "5")],
        );

        let errors = result.unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    /// Items with zero or negative quantity are skipped silently
    #[test]
    fn test_non_positive_quantities_skipped() {
        let mut balances = seed(&[(1, "A1", "15")]);
        let mut movements = Vec::new();

        let result = execute_transfer(
            &mut balances,
            &mut movements,
            1,
            2,
            &[item("A1", "0"), item("A1", "-3")],
        );

        assert!(result.is_ok());
        assert_eq!(balances[&(1, "A1".to_string())], dec("15"));
        assert!(movements.is_empty());
    }

    /// Destination row is created on first transfer, incremented afterwards
    #[test]
    fn test_destination_upsert_accumulates() {
        let mut balances = seed(&[(1, "A1", "15"), (2, "A1", "4")]);
        let mut movements = Vec::new();

        let result = execute_transfer(
            &mut balances,
            &mut movements,
            1,
            2,
            &[item("A1", "6")],
        );

        assert!(result.is_ok());
        assert_eq!(balances[&(2, "A1".to_string())], dec("10"));
    }

    /// Availability listing is ordered by descending quantity
    #[test]
    fn test_availability_ordered_descending() {
        let balances = seed(&[(1, "A1", "2"), (2, "A1", "9"), (3, "A1", "5")]);
        let available = availability(&balances, "A1");

        let quantities: Vec<Decimal> = available.iter().map(|a| a.quantity).collect();
        assert_eq!(quantities, vec![dec("9"), dec("5"), dec("2")]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::ledger::*;
    use super::*;

    /// Strategy for generating positive quantities
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1)) // 0.1 to 1000.0
    }

    fn article_strategy() -> impl Strategy<Value = String> {
        prop_oneof![Just("A1"), Just("A2"), Just("A3")].prop_map(str::to_string)
    }

    fn total_stock(balances: &Balances) -> Decimal {
        balances.values().copied().sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Total stock across all storages is conserved by any transfer
        /// outcome, success or rollback
        #[test]
        fn prop_transfer_conserves_total_stock(
            held in quantity_strategy(),
            requested in quantity_strategy(),
            article in article_strategy()
        ) {
            let mut balances = Balances::new();
            balances.insert((1, article.clone()), held);
            let mut movements = Vec::new();

            let before = total_stock(&balances);
            let _ = execute_transfer(
                &mut balances,
                &mut movements,
                1,
                2,
                &[TransferItemInput { article_code: article, quantity: requested }],
            );

            prop_assert_eq!(total_stock(&balances), before);
        }

        /// A successful transfer deducts exactly the requested quantity from
        /// the source and adds it to the destination
        #[test]
        fn prop_successful_transfer_balances(
            held in quantity_strategy(),
            requested in quantity_strategy(),
            article in article_strategy()
        ) {
            prop_assume!(held >= requested);

            let mut balances = Balances::new();
            balances.insert((1, article.clone()), held);
            let mut movements = Vec::new();

            let result = execute_transfer(
                &mut balances,
                &mut movements,
                1,
                2,
                &[TransferItemInput { article_code: article.clone(), quantity: requested }],
            );

            prop_assert!(result.is_ok());
            prop_assert_eq!(balances[&(1, article.clone())], held - requested);
            prop_assert_eq!(balances[&(2, article)], requested);
            prop_assert_eq!(movements.len(), 1);
        }

        /// A short transfer leaves every balance untouched and records no
        /// movement
        #[test]
        fn prop_short_transfer_changes_nothing(
            held in quantity_strategy(),
            extra in quantity_strategy(),
            article in article_strategy()
        ) {
            let requested = held + extra; // Always above the held quantity

            let mut balances = Balances::new();
            balances.insert((1, article.clone()), held);
            let snapshot = balances.clone();
            let mut movements = Vec::new();

            let result = execute_transfer(
                &mut balances,
                &mut movements,
                1,
                2,
                &[TransferItemInput { article_code: article, quantity: requested }],
            );

            prop_assert!(result.is_err());
            prop_assert_eq!(&balances, &snapshot);
            prop_assert!(movements.is_empty());
        }

        /// No balance ever goes negative, whatever the request mix
        #[test]
        fn prop_no_negative_balances(
            held in quantity_strategy(),
            requests in prop::collection::vec((article_strategy(), quantity_strategy()), 1..8)
        ) {
            let mut balances = Balances::new();
            balances.insert((1, "A1".to_string()), held);
            let mut movements = Vec::new();

            let items: Vec<TransferItemInput> = requests
                .into_iter()
                .map(|(article_code, quantity)| TransferItemInput { article_code, quantity })
                .collect();

            let _ = execute_transfer(&mut balances, &mut movements, 1, 2, &items);

            for quantity in balances.values() {
                prop_assert!(*quantity >= Decimal::ZERO);
            }
        }
    }
}

// ============================================================================
// Shortfall Message Tests
// ============================================================================

#[cfg(test)]
mod message_tests {
    use super::*;

    #[test]
    fn test_message_names_article_and_storages() {
        let available = vec![
            ArticleAvailability {
                storage_name: "Depozit Central".to_string(),
                quantity: dec("7"),
            },
        ];
        let msg = shortfall_message("A42", &available);
        assert_eq!(
            msg,
            "Articolul A42 nu este disponibil în depozitul sursă. \
             Disponibil în: Depozit Central (7 buc)."
        );
    }

    #[test]
    fn test_message_without_availability() {
        let msg = shortfall_message("A42", &[]);
        assert_eq!(
            msg,
            "Articolul A42 nu este disponibil în depozitul sursă. \
             Disponibil în: niciun depozit."
        );
    }
}
