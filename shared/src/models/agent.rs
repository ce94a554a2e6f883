//! Agent (counterparty) models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered counterparty (customer or vendor)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: i64,
    pub agent_code: String,
    pub is_resident: bool,
    /// Individual vs. legal entity; determines which identity fields matter
    pub is_individual: bool,
    pub name: String,
    pub full_name: Option<String>,
    pub legal_address: Option<String>,
    pub postal_address: Option<String>,
    pub phone: Option<String>,
    pub fiscal_code: Option<String>,
    pub city: Option<String>,
    pub reg_number: Option<String>,
    pub country: String,
    pub district: Option<String>,
    pub credit_days: i32,
    pub discount: Decimal,
    pub use_individual_discount: bool,
    pub created_at: DateTime<Utc>,
}

/// A bank account owned by an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAccount {
    pub id: i64,
    pub agent_id: i64,
    pub bank_name: String,
    pub iban: String,
    pub swift: Option<String>,
    pub is_active: bool,
}

/// Input for registering a new agent with its bank accounts
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentInput {
    #[validate(length(min = 1, max = 10))]
    pub agent_code: Option<String>,
    #[serde(default = "default_true")]
    pub is_resident: bool,
    #[serde(default = "default_true")]
    pub is_individual: bool,
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub legal_address: Option<String>,
    pub postal_address: Option<String>,
    pub phone: Option<String>,
    pub fiscal_code: Option<String>,
    pub city: Option<String>,
    pub reg_number: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    pub district: Option<String>,
    #[serde(default)]
    pub credit_days: i32,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub use_individual_discount: bool,
    #[serde(default)]
    pub accounts: Vec<BankAccountInput>,
}

/// A bank account line inside an agent registration.
/// Lines missing the bank name or IBAN are skipped rather than rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountInput {
    pub bank_name: Option<String>,
    pub iban: Option<String>,
    pub swift: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn default_country() -> String {
    "MD".to_string()
}
