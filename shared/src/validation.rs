//! Validation utilities for the UNA Stock Management Platform
//!
//! Includes document arithmetic shared by the confirmation workflow and
//! Moldova-specific validations (IDNO, IBAN, phone numbers).

use rust_decimal::Decimal;

use crate::models::{ArticleAvailability, RealizationItemInput};
use crate::types::{round_money, DocumentTotals};

// ============================================================================
// Document Arithmetic
// ============================================================================

/// Total for one line, rounded to money precision
pub fn line_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    round_money(quantity * unit_price)
}

/// VAT value carried by one line
pub fn vat_value(line_total: Decimal, vat_percent: Decimal) -> Decimal {
    round_money(line_total * vat_percent / Decimal::from(100))
}

/// Recompute document totals from its line items
pub fn document_totals(items: &[RealizationItemInput]) -> DocumentTotals {
    let mut total_amount = Decimal::ZERO;
    let mut total_vat = Decimal::ZERO;
    for item in items {
        let line = line_total(item.quantity, item.unit_price);
        total_amount += line;
        total_vat += vat_value(line, item.vat_percent);
    }
    DocumentTotals::new(total_amount, total_vat)
}

/// Declared vs. recomputed totals that disagree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsMismatch {
    pub expected: DocumentTotals,
    pub declared: DocumentTotals,
}

/// One-cent tolerance: client-side totals arrive from float arithmetic
const TOTALS_TOLERANCE_CENTS: i64 = 1;

/// Verify caller-declared totals against the recomputed ones.
/// Returns the recomputed totals on success so they can be persisted as the
/// authoritative values.
pub fn verify_declared_totals(
    items: &[RealizationItemInput],
    declared: DocumentTotals,
) -> Result<DocumentTotals, TotalsMismatch> {
    let expected = document_totals(items);
    let tolerance = Decimal::new(TOTALS_TOLERANCE_CENTS, 2);

    let amount_ok = (expected.total_amount - declared.total_amount).abs() <= tolerance;
    let vat_ok = (expected.total_vat - declared.total_vat).abs() <= tolerance;

    if amount_ok && vat_ok {
        Ok(expected)
    } else {
        Err(TotalsMismatch { expected, declared })
    }
}

// ============================================================================
// Transfer Shortfalls
// ============================================================================

/// Human-readable shortfall message for one article, listing the storages
/// that do hold it (callers pass them ordered by descending quantity)
pub fn shortfall_message(article_code: &str, available: &[ArticleAvailability]) -> String {
    let listing = if available.is_empty() {
        "niciun depozit".to_string()
    } else {
        available
            .iter()
            .map(|a| format!("{} ({} buc)", a.storage_name, a.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Articolul {} nu este disponibil în depozitul sursă. Disponibil în: {}.",
        article_code, listing
    )
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate agent code format (1-10 alphanumeric characters)
pub fn validate_agent_code(code: &str) -> Result<(), &'static str> {
    if code.is_empty() {
        return Err("Agent code must not be empty");
    }
    if code.len() > 10 {
        return Err("Agent code must be at most 10 characters");
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Agent code must be alphanumeric only");
    }
    Ok(())
}

// ============================================================================
// Moldova-Specific Validations
// ============================================================================

/// Validate a Moldovan IDNO/IDNP (13-digit state identification number)
/// with checksum verification
pub fn validate_idno(idno: &str) -> Result<(), &'static str> {
    let digits: Vec<u32> = idno.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 13 || idno.chars().any(|c| !c.is_ascii_digit()) {
        return Err("IDNO must be exactly 13 digits");
    }

    // Checksum: first 12 digits weighted cyclically by 7, 3, 1; sum mod 10
    // must equal the 13th digit
    const WEIGHTS: [u32; 3] = [7, 3, 1];
    let sum: u32 = digits
        .iter()
        .take(12)
        .enumerate()
        .map(|(i, &d)| d * WEIGHTS[i % 3])
        .sum();

    if sum % 10 != digits[12] {
        return Err("Invalid IDNO checksum");
    }

    Ok(())
}

/// Validate a Moldovan IBAN (MD + 2 check digits + 18 alphanumeric BBAN
/// characters) including the ISO 13616 mod-97 check
pub fn validate_moldovan_iban(iban: &str) -> Result<(), &'static str> {
    let iban: String = iban.chars().filter(|c| !c.is_whitespace()).collect();

    if iban.len() != 24 {
        return Err("Moldovan IBAN must be 24 characters");
    }
    if !iban.starts_with("MD") {
        return Err("Moldovan IBAN must start with MD");
    }
    if !iban.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("IBAN must be alphanumeric only");
    }

    // ISO 13616: move the first four characters to the end, expand letters
    // to two-digit values (A=10 .. Z=35), and the number mod 97 must be 1
    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);
    let mut remainder: u64 = 0;
    for c in rearranged.chars() {
        let value = match c.to_digit(36) {
            Some(v) => v as u64,
            None => return Err("IBAN must be alphanumeric only"),
        };
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }

    if remainder != 1 {
        return Err("Invalid IBAN check digits");
    }

    Ok(())
}

/// Validate a Moldovan phone number
/// Accepts: 069123456, 069-123-456, +37369123456
pub fn validate_moldovan_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // National format: 9 digits starting with 0 (e.g., 069123456)
    if digits.len() == 9 && digits.starts_with('0') {
        return Ok(());
    }
    // Subscriber number without the leading 0: 8 digits
    if digits.len() == 8 && !digits.starts_with('0') {
        return Ok(());
    }
    // International format with country code: 11 digits starting with 373
    if digits.len() == 11 && digits.starts_with("373") {
        return Ok(());
    }

    Err("Invalid Moldovan phone number format")
}

/// Moldovan districts (raioane) plus the two municipalities
pub const MOLDOVA_DISTRICTS: &[&str] = &[
    "Chișinău",
    "Bălți",
    "Anenii Noi",
    "Basarabeasca",
    "Briceni",
    "Cahul",
    "Cantemir",
    "Călărași",
    "Căușeni",
    "Cimișlia",
    "Criuleni",
    "Dondușeni",
    "Drochia",
    "Dubăsari",
    "Edineț",
    "Fălești",
    "Florești",
    "Glodeni",
    "Hîncești",
    "Ialoveni",
    "Leova",
    "Nisporeni",
    "Ocnița",
    "Orhei",
    "Rezina",
    "Rîșcani",
    "Sîngerei",
    "Soroca",
    "Strășeni",
    "Șoldănești",
    "Ștefan Vodă",
    "Taraclia",
    "Telenești",
    "Ungheni",
];

/// Validate a district name against the reference list (case-insensitive)
pub fn validate_district(district: &str) -> Result<(), &'static str> {
    let lowered = district.to_lowercase();
    if MOLDOVA_DISTRICTS
        .iter()
        .any(|d| d.to_lowercase() == lowered)
    {
        Ok(())
    } else {
        Err("Unknown district")
    }
}
