//! Agent (counterparty) registration service

use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::CreateAgentInput;
use shared::validation::{validate_agent_code, validate_idno, validate_moldovan_iban};

/// Service for registering agents and their bank accounts
#[derive(Clone)]
pub struct AgentService {
    db: PgPool,
}

impl AgentService {
    /// Create a new AgentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register an agent together with its bank accounts in one transaction.
    /// Account lines missing the bank name or IBAN are skipped.
    pub async fn create_agent(&self, input: CreateAgentInput) -> AppResult<i64> {
        let (agent_code, name) = match (&input.agent_code, &input.name) {
            (Some(code), Some(name)) if !code.trim().is_empty() && !name.trim().is_empty() => {
                (code.trim().to_string(), name.trim().to_string())
            }
            _ => {
                return Err(AppError::Validation {
                    field: "agentCode/name".to_string(),
                    message: "Agent code and name are required".to_string(),
                    message_ro: "Codul și Denumirea sunt obligatorii!".to_string(),
                })
            }
        };

        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        validate_agent_code(&agent_code).map_err(|msg| AppError::Validation {
            field: "agentCode".to_string(),
            message: msg.to_string(),
            message_ro: "Codul agentului este invalid".to_string(),
        })?;

        if let Some(fiscal_code) = input.fiscal_code.as_deref().filter(|f| !f.is_empty()) {
            validate_idno(fiscal_code).map_err(|msg| AppError::Validation {
                field: "fiscalCode".to_string(),
                message: msg.to_string(),
                message_ro: "Codul fiscal (IDNO) este invalid".to_string(),
            })?;
        }

        // Only accounts with both a bank name and an IBAN are persisted
        let accounts: Vec<_> = input
            .accounts
            .iter()
            .filter_map(|acc| match (&acc.bank_name, &acc.iban) {
                (Some(bank_name), Some(iban))
                    if !bank_name.trim().is_empty() && !iban.trim().is_empty() =>
                {
                    Some((bank_name.clone(), iban.clone(), acc.swift.clone(), acc.is_active))
                }
                _ => None,
            })
            .collect();

        for (_, iban, _, _) in &accounts {
            validate_moldovan_iban(iban).map_err(|msg| AppError::Validation {
                field: "iban".to_string(),
                message: msg.to_string(),
                message_ro: format!("IBAN invalid: {}", iban),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let agent_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO agents (
                agent_code, is_resident, is_individual, name, full_name, legal_address,
                postal_address, phone, fiscal_code, city, reg_number, country, district,
                credit_days, discount, use_individual_discount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(&agent_code)
        .bind(input.is_resident)
        .bind(input.is_individual)
        .bind(&name)
        .bind(&input.full_name)
        .bind(&input.legal_address)
        .bind(&input.postal_address)
        .bind(&input.phone)
        .bind(&input.fiscal_code)
        .bind(&input.city)
        .bind(&input.reg_number)
        .bind(&input.country)
        .bind(&input.district)
        .bind(input.credit_days)
        .bind(input.discount)
        .bind(input.use_individual_discount)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::Conflict {
                resource: "agentCode".to_string(),
                message: "Agent code already exists".to_string(),
                message_ro: "Codul agentului există deja!".to_string(),
            },
            _ => AppError::DatabaseError(e),
        })?;

        for (bank_name, iban, swift, is_active) in &accounts {
            sqlx::query(
                r#"
                INSERT INTO agent_accounts (agent_id, bank_name, iban, swift, is_active)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(agent_id)
            .bind(bank_name)
            .bind(iban)
            .bind(swift)
            .bind(is_active)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(agent_id)
    }
}
