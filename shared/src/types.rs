//! Common types used across the platform

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Declared or computed totals of one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTotals {
    pub total_amount: Decimal,
    pub total_vat: Decimal,
}

impl DocumentTotals {
    pub fn new(total_amount: Decimal, total_vat: Decimal) -> Self {
        Self {
            total_amount,
            total_vat,
        }
    }
}

/// Inclusive date range used by report filters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Round a monetary value to two decimal places
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(2)
}
