//! # Validation Module
//!
//! Input validation and coercion rules for tillbox.
//!
//! ## Two Kinds of Bad Input
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Validation vs Coercion                        │
//! │                                                                 │
//! │  HARD failures (operation aborts, user sees a warning):         │
//! │  ├── missing record name                                        │
//! │  ├── negative record amount                                     │
//! │  └── zero records selected for a receipt (checked in receipt)   │
//! │                                                                 │
//! │  SOFT failures (silently coerced, operation proceeds):          │
//! │  ├── non-numeric discount / tax input  → 0                      │
//! │  ├── negative discount / tax input     → 0                      │
//! │  └── quantity below 1                  → 1                      │
//! │                                                                 │
//! │  The soft rules reproduce the entry form's forgiving behavior   │
//! │  ("parse it or fall back to zero") exactly.                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::RecordDraft;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted record name.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Hard Validation
// =============================================================================

/// Validates a record name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most [`MAX_NAME_LEN`] characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a draft before it is handed to either store.
///
/// A missing barcode is fine (one is generated); a missing name is not.
pub fn validate_draft(draft: &RecordDraft) -> ValidationResult<()> {
    validate_name(&draft.name)?;

    if draft.amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Soft Coercion
// =============================================================================

/// Parses a user-supplied amount, coercing non-numeric or negative input to
/// zero.
///
/// ## Example
/// ```rust
/// use tillbox_core::validation::coerce_amount;
/// use tillbox_core::Money;
///
/// assert_eq!(coerce_amount("9.99"), Money::from_major_minor(9, 99));
/// assert_eq!(coerce_amount("abc"), Money::zero());
/// assert_eq!(coerce_amount("-3"), Money::zero());
/// ```
pub fn coerce_amount(input: &str) -> Money {
    match Money::parse(input) {
        Some(value) if !value.is_negative() => value,
        _ => Money::zero(),
    }
}

/// Parses a user-supplied tax rate percent, coercing non-numeric or negative
/// input to zero.
pub fn coerce_rate(input: &str) -> Decimal {
    match Decimal::from_str(input.trim()) {
        Ok(rate) if rate >= Decimal::ZERO => rate,
        _ => Decimal::ZERO,
    }
}

/// Floors a line quantity at 1.
#[inline]
pub fn normalize_quantity(quantity: i64) -> i64 {
    quantity.max(1)
}

// =============================================================================
// Barcode Generation
// =============================================================================

/// Generates a barcode value for a record created without one.
///
/// Millisecond timestamp plus a short random suffix. Not a valid checksummed
/// symbology value; it identifies the record, nothing more.
pub fn generate_barcode(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", now.timestamp_millis(), &suffix[..9])
}

// =============================================================================
// Unit Tests
// =============================================================================
